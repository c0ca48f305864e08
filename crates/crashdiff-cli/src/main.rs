//! crashdiff CLI
//!
//! Command-line interface for comparing crash-analysis records

use clap::{Parser, Subcommand};
use crashdiff_core::logging_facility::{self, Profile};

mod commands;

/// No differences after filtering
const EXIT_SAME: i32 = 0;
/// At least one difference survived filtering
const EXIT_DIFFERENT: i32 = 1;
/// The comparison could not be completed
const EXIT_ERROR: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "crashdiff")]
#[command(about = "crashdiff - Structural diff for crash-analysis records", long_about = None)]
struct Cli {
    /// Logging profile (development, production, test); logs go to stderr
    #[arg(long, global = true, default_value = "production")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two JSON crash records
    Diff(commands::diff::DiffArgs),
    /// Validate a configuration file
    CheckConfig(commands::check_config::CheckConfigArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::CheckConfig(args) => commands::check_config::execute(args).map(|()| false),
    };

    match result {
        Ok(false) => std::process::exit(EXIT_SAME),
        Ok(true) => std::process::exit(EXIT_DIFFERENT),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}
