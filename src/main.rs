//! LinkedIn Game Data
//!
//! Batch tooling that turns screenshots of LinkedIn puzzle results screens
//! into a table: capture times via exiftool, text via a vision OCR model,
//! then game, round and times parsed from the text.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkedin_game_data::config::{PipelineConfig, DEFAULT_CONFIG_FILE};
use linkedin_game_data::{exif, ocr, pipeline, table};

#[derive(Parser, Debug)]
#[command(name = "linkedin-game-data")]
#[command(about = "Extract LinkedIn game results from screenshots", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log progress as well as warnings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect capture timestamps into exif.csv
    Exif {
        /// Source directory
        #[arg(short = 'p', long = "path")]
        path: PathBuf,
        /// Output directory
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },

    /// Run the OCR model over a screenshot or directory of screenshots
    Ocr {
        /// Source directory or single image
        #[arg(short = 'p', long = "path")]
        path: PathBuf,
        /// Force overwrite existing responses
        #[arg(short, long)]
        force: bool,
    },

    /// Parse OCR responses into the results table
    Parse,

    /// List screenshots with unparsed fields
    Missing,

    /// Compare two results tables for changed avg_time values
    Compare {
        before: PathBuf,
        after: PathBuf,
    },

    /// Write the default configuration file
    InitConfig,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PipelineConfig::load(&cli.config);

    match cli.command {
        Commands::Exif { path, output } => {
            let csv_path = exif::run_exif(&config.exiftool, &path, &output)?;
            println!("Wrote {}", csv_path.display());
        }
        Commands::Ocr { path, force } => {
            let client = ocr::OllamaClient::new(&config.ollama_host, &config.ocr_model)?;
            info!("Using OCR model {}", client.model());
            let summary = ocr::run_ocr(&client, &path, &config.ocr_output_dir, force)?;
            println!(
                "Processed {}, skipped {} existing, {} unsupported, {} failed",
                summary.processed, summary.skipped_existing, summary.skipped_type, summary.failed
            );
        }
        Commands::Parse => {
            pipeline::parse_responses(&config)?;
        }
        Commands::Missing => {
            table::write_missing_values(&config.results_csv, &config.missing_values_txt)?;
        }
        Commands::Compare { before, after } => {
            let comparison = table::compare_results(&before, &after)?;
            print!("{}", comparison.render());
        }
        Commands::InitConfig => {
            PipelineConfig::save_default(&cli.config)?;
            println!("Wrote {}", cli.config.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ocr_args() {
        let cli = Cli::parse_from(["linkedin-game-data", "ocr", "-p", "data/photos", "-f"]);
        match cli.command {
            Commands::Ocr { path, force } => {
                assert_eq!(path, PathBuf::from("data/photos"));
                assert!(force);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_parse_compare_args() {
        let cli = Cli::parse_from(["linkedin-game-data", "-v", "compare", "a.csv", "b.csv"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Compare { .. }));
    }
}
