//! sinbad-migrate - one-shot Supabase schema setup
//!
//! Posts each statement of the migration file to the project's `exec_sql`
//! RPC. Credentials come from configuration, e.g. `SINBAD_SUPABASE_URL` and
//! `SINBAD_SERVICE_ROLE_KEY`.

use clap::Parser;
use sinbad_assets::config_loader::Settings;
use sinbad_assets::migrate::MigrationClient;
use sinbad_assets::Result;
use std::path::PathBuf;
use std::process;

/// Set up the Sinbad database tables
#[derive(Parser)]
#[command(name = "sinbad-migrate")]
#[command(version)]
#[command(about = "Execute the Sinbad SQL migration against Supabase", long_about = None)]
struct Cli {
    /// Migration file (overrides migration_path)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Extra configuration file
    #[arg(long)]
    config: Option<PathBuf>,

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
    let settings = Settings::load(cli.config.as_deref())?;
    let path = cli.file.unwrap_or_else(|| settings.migration_path.clone());

    println!("Sinbad Memory Game - Database Setup");
    println!("{}", "=".repeat(60));

    let sql = match std::fs::read_to_string(&path) {
        Ok(sql) => sql,
        Err(e) => {
            eprintln!("Error: SQL migration file not found!");
            eprintln!("   Expected: {}", path.display());
            return Err(e.into());
        }
    };
    println!("SQL file loaded ({} characters)", sql.chars().count());

    let client = MigrationClient::from_settings(&settings)?;
    let report = client.execute_all(&sql);

    if report.all_succeeded() {
        println!("\nDatabase setup completed successfully!");
    } else {
        println!("\nSome errors occurred during setup.");
        println!("You may need to execute the SQL manually in the Supabase Dashboard:");
        println!("1. Go to: {}", client.base_url());
        println!("2. Open SQL Editor");
        println!("3. Copy content from: {}", path.display());
        println!("4. Click 'Run'");
    }
    Ok(())
}
