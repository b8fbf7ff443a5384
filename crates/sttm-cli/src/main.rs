//! STTM CLI - Command-line interface for source-to-target mapping
//!
//! This is the main entry point for the `sttm` binary, providing commands
//! for validating mapping catalogs and transforming record batches.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Load configuration before logging so its `logging` section applies
    let config = Config::load_with_file(cli.config.as_deref());

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    let format = cli
        .output
        .or(config.output.format)
        .unwrap_or(OutputFormat::Human);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);
    if !config.output.progress {
        output.disable_progress();
    }

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Transform(args) => handlers::handle_transform(args, &config, &mut output).await,
        Commands::Masks => handlers::handle_masks(&mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_with_file(&config.logging, verbosity);
    }

    // Environment overrides the configuration file
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["sttm", "-vv", "validate", "catalog.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["sttm", "--quiet", "masks"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["sttm", "-o", "json-pretty", "masks"]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));
    }
}
