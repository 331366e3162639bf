//! altium-libgen: generates repetitive Altium Designer component libraries
//!
//! Runs the resistor (E96) and capacitor (supplier CSV) pipelines and writes
//! PCAD ASCII libraries ready for import.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use altium_libgen::config;
use altium_libgen::library::LibraryGenerator;

/// Template-driven generator for repetitive Altium Designer libraries.
///
/// Without arguments, renders `resistors.lia` and `capacitors.lia` from the
/// `templates/` directory into the current directory, reading capacitors
/// from `capa_list.csv`.
#[derive(Parser, Debug)]
#[command(name = "altium-libgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// GPL-3.0 §5(d) notice shown at startup.
fn license_notice() -> String {
    format!(
        "altium-libgen {}  Copyright (C) 2026  The Embedded Society\n\
         This program comes with ABSOLUTELY NO WARRANTY.\n\
         This is free software, licensed under GPL-3.0-or-later.\n\
         Source: {}\n",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY")
    )
}

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(args.verbose, args.quiet, &cfg.logging.level));

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!("{}", license_notice());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        templates = %cfg.template_dir.display(),
        output = %cfg.output_dir.display(),
        "Starting library generation"
    );

    let result = LibraryGenerator::new(cfg).and_then(|generator| generator.run());

    match result {
        Ok(written) => {
            for path in &written {
                info!(path = %path.display(), "Generated");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Library generation failed");
            eprintln!("Error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
