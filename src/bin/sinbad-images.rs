//! sinbad-images - item illustration generator for the Sinbad memory game
//!
//! Finds game items without an image and generates them in batches, pausing
//! between batches to stay under the image service's rate limit.

use clap::Parser;
use sinbad_assets::backends::{create_backend, AssetMedium, BackendKind};
use sinbad_assets::catalog::{AssetLayout, Requirement};
use sinbad_assets::config_loader::Settings;
use sinbad_assets::content::{extract_requirements, GameContent};
use sinbad_assets::driver::{plan, BatchDriver};
use sinbad_assets::pacer::SleepPacer;
use sinbad_assets::scanner::scan_existing;
use sinbad_assets::{AssetError, Result};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// Generate game item images
#[derive(Parser)]
#[command(name = "sinbad-images")]
#[command(version)]
#[command(about = "Generate missing item images for the Sinbad memory game", long_about = None)]
struct Cli {
    /// Number of images per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Starting index into the missing items
    #[arg(long, default_value = "0")]
    start_index: usize,

    /// Show what would be generated without actually generating
    #[arg(long)]
    dry_run: bool,

    /// Extra configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game content file (overrides game_data_path)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Output directory (overrides image_dir)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exit with an error if any image failed
    #[arg(long)]
    strict: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    sinbad_assets::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(content) = cli.content {
        settings.game_data_path = content;
    }
    if let Some(output) = cli.output {
        settings.image_dir = output;
    }
    let batch_size = cli.batch_size.unwrap_or(settings.image_batch_size);

    println!("Sinbad Memory Game - Image Generation");
    println!("{}", "=".repeat(60));

    println!("\nLoading game items...");
    let content = GameContent::load(&settings.game_data_path)?;
    let requirements: Vec<Requirement> = extract_requirements(&content)
        .into_iter()
        .map(Requirement::label)
        .collect();
    println!("   Total items: {}", requirements.len());

    println!("\nChecking existing images...");
    let layout = AssetLayout::images(&settings.image_dir);
    let existing = scan_existing(&layout)?;
    println!("   Already generated: {}", existing.len());

    let batch_plan = plan(&requirements, &existing, &layout)?;
    println!("   Missing: {}", batch_plan.missing.len());

    if batch_plan.missing.is_empty() {
        println!("\nAll images already generated!");
        return Ok(());
    }

    if cli.dry_run {
        println!("\nDRY RUN - Would generate:");
        for (idx, asset) in batch_plan.missing.iter().enumerate() {
            println!(
                "   {}. {} -> {}",
                idx + 1,
                asset.requirement.key,
                layout.file_name(&asset.slug)
            );
        }
        return Ok(());
    }

    let kind = BackendKind::for_medium(&settings.image_backend, AssetMedium::Image)?;
    let backend = create_backend(kind, &settings);
    let driver = BatchDriver::new(batch_size, Duration::from_millis(settings.image_batch_pause_ms))?
        .with_start_index(cli.start_index);

    println!("\nStarting generation...");
    println!("   Backend: {}", kind);
    println!("   Batch size: {}", batch_size);
    println!("   Starting from index: {}", cli.start_index);

    let report = driver.run(&batch_plan, backend.as_ref(), &mut SleepPacer);

    println!("\n{}", "=".repeat(60));
    println!("Image generation complete!");
    println!("   Generated: {} images", report.generated);
    println!("   Failed: {}", report.failed());
    if report.skipped > 0 {
        println!("   Skipped before start index: {}", report.skipped);
    }
    println!("   Total items: {}", batch_plan.total);

    if cli.strict && report.failed() > 0 {
        return Err(AssetError::GenerationFailed {
            failed: report.failed(),
            what: "images",
        });
    }
    Ok(())
}
