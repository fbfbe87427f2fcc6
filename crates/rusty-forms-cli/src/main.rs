mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rusty-forms")]
#[command(version, about = "rusty-forms CLI - declarative form validation rules", long_about = None)]
struct Cli {
    /// Log rule normalization and per-field outcomes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON object of field values against a rules file
    Check {
        /// Rules file (.toml or .json)
        #[arg(short, long)]
        rules: PathBuf,

        /// JSON object mapping field names to values
        #[arg(long)]
        values: PathBuf,
    },

    /// List the preset rules and their default messages
    Rules,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { rules, values } => {
            let passed = commands::check::execute(&rules, &values)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Rules => {
            commands::rules::execute();
            Ok(ExitCode::SUCCESS)
        }
    }
}
