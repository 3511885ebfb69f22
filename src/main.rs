//! sinbad-audio - Arabic voice clip generator for the Sinbad memory game
//!
//! Voices the fixed instruction, encouragement and number phrases plus every
//! item name found in the game content, skipping clips that already exist.

use clap::{Parser, ValueEnum};
use sinbad_assets::backends::{create_backend, AssetMedium, BackendKind};
use sinbad_assets::catalog::AudioCategory;
use sinbad_assets::config_loader::Settings;
use sinbad_assets::content::{extract_requirements, GameContent};
use sinbad_assets::driver::{plan, BatchDriver};
use sinbad_assets::pacer::SleepPacer;
use sinbad_assets::scanner::scan_existing;
use sinbad_assets::slug::slugify;
use sinbad_assets::{AssetError, Result};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AudioType {
    All,
    Instructions,
    Items,
    Encouragement,
    Numbers,
}

impl AudioType {
    fn categories(self) -> Vec<AudioCategory> {
        match self {
            AudioType::All => AudioCategory::ALL.to_vec(),
            AudioType::Instructions => vec![AudioCategory::Instructions],
            AudioType::Items => vec![AudioCategory::Items],
            AudioType::Encouragement => vec![AudioCategory::Encouragement],
            AudioType::Numbers => vec![AudioCategory::Numbers],
        }
    }
}

/// Generate game audio files
#[derive(Parser)]
#[command(name = "sinbad-audio")]
#[command(version)]
#[command(about = "Generate Arabic audio clips for the Sinbad memory game", long_about = None)]
struct Cli {
    /// Type of audio to generate
    #[arg(long = "type", value_enum, default_value_t = AudioType::All)]
    audio_type: AudioType,

    /// Use OpenAI TTS (requires API key)
    #[arg(long)]
    openai: bool,

    /// List what would be generated
    #[arg(long)]
    list: bool,

    /// Extra configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game content file (overrides game_data_path)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Output directory (overrides audio_dir)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exit with an error if any clip failed
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
        settings.audio_dir = output;
    }

    println!("Sinbad Memory Game - Audio Generation");
    println!("{}", "=".repeat(60));

    if cli.list {
        return list_audio(&settings);
    }

    let kind: BackendKind = if cli.openai {
        BackendKind::OpenAi
    } else {
        BackendKind::for_medium(&settings.tts_backend, AssetMedium::Audio)?
    };
    let backend = create_backend(kind, &settings);
    println!("\nUsing {}", kind);
    println!("{}", "=".repeat(60));

    let categories = cli.audio_type.categories();
    // Load before generating anything so bad content aborts the whole run
    let content = if categories.contains(&AudioCategory::Items) {
        Some(GameContent::load(&settings.game_data_path)?)
    } else {
        None
    };

    let driver = BatchDriver::new(
        settings.audio_batch_size,
        Duration::from_millis(settings.audio_batch_pause_ms),
    )?;
    let mut pacer = SleepPacer;

    let mut generated = 0;
    let mut failed = 0;
    for category in categories {
        println!("\nGenerating {} audio...", category);
        let layout = category.layout(&settings.audio_dir);
        let requirements = category.requirements(content.as_ref());
        let existing = scan_existing(&layout)?;
        let batch_plan = plan(&requirements, &existing, &layout)?;

        println!(
            "   Total: {}, already generated: {}, missing: {}",
            batch_plan.total,
            batch_plan.already_present,
            batch_plan.missing.len()
        );
        if batch_plan.missing.is_empty() {
            continue;
        }

        let report = driver.run(&batch_plan, backend.as_ref(), &mut pacer);
        generated += report.generated;
        failed += report.failed();
    }

    println!("\n{}", "=".repeat(60));
    println!("Audio generation complete!");
    println!("   Generated: {} files", generated);
    println!("   Failed: {}", failed);
    println!("   Location: {}", settings.audio_dir.display());

    if cli.strict && failed > 0 {
        return Err(AssetError::GenerationFailed {
            failed,
            what: "audio clips",
        });
    }
    Ok(())
}

fn list_audio(settings: &Settings) -> Result<()> {
    println!("\nAudio files to generate:");
    let mut total = 0;

    for category in [AudioCategory::Instructions, AudioCategory::Encouragement] {
        let layout = category.layout(&settings.audio_dir);
        let phrases = category.fixed_phrases();
        println!("\n{}: {} files", category, phrases.len());
        for phrase in &phrases {
            println!("   - {}", layout.file_name(&slugify(&phrase.key)));
        }
        total += phrases.len();
    }

    let numbers = AudioCategory::Numbers.fixed_phrases().len();
    println!("\nnumbers: {} files", numbers);
    total += numbers;

    let content = GameContent::load(&settings.game_data_path)?;
    let items = extract_requirements(&content);
    println!("\nitems: {} files", items.len());
    let preview: Vec<&str> = items.iter().take(10).map(String::as_str).collect();
    println!("   (First 10: {}...)", preview.join(", "));
    total += items.len();

    println!("\nTotal: {} files", total);
    Ok(())
}
