//! Config-migrate CLI - Rewrite configurations for the Postgres jsonb layout
//!
//! ```bash
//! migrate-configurations    # configurations.csv -> configurations_pg.csv
//! ```
//!
//! Both paths are relative to the working directory. The tool takes no
//! options besides `--help` and `--version`.

use clap::Parser;
use config_migrate::logs::log_error;
use config_migrate::{migrate, MigrationOptions};

#[derive(Parser)]
#[command(name = "migrate-configurations")]
#[command(version)]
#[command(
    about = "Migrate configurations.csv to configurations_pg.csv (Postgres jsonb layout)",
    long_about = None
)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();

    let options = MigrationOptions::default();

    if let Err(e) = migrate(&options) {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }

    eprintln!("\n✨ Done! Output written to {}", options.output_path.display());
}
