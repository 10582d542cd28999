//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod compile;
mod matrix;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{resolve_config, CliOverrides, StyleformConfig};
use crate::mode::BuildMode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Styleform - compile style transform lists into 4x4 matrices
#[derive(Parser)]
#[command(name = "styleform")]
#[command(about = "Styleform - compile style transform lists into 4x4 transformation matrices")]
#[command(version)]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to styleform.toml (default: discovered from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a stream of styles (JSONL or JSON5), replacing `transform` with `transformMatrix`
    Compile {
        /// Input file; reads stdin when omitted or '-'
        input: Option<PathBuf>,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Validation mode: strict checks and freezes, fast trusts input
        #[arg(long, value_enum)]
        mode: Option<BuildMode>,

        /// Pretty-print each compiled style
        #[arg(long)]
        pretty: bool,

        /// Round matrix entries to this many decimal places
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=15))]
        precision: Option<u32>,
    },

    /// Compose an inline transform list and print the resulting matrix
    Matrix {
        /// Transform list as JSON5, e.g. '[{rotate: "90deg"}, {scale: 2}]'
        transform: String,

        /// Validation mode: strict checks, fast trusts input
        #[arg(long, value_enum)]
        mode: Option<BuildMode>,

        /// Print as a 4x4 grid (rows top to bottom) instead of 16 column-major values
        #[arg(long)]
        grid: bool,

        /// Round matrix entries to this many decimal places
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=15))]
        precision: Option<u32>,
    },

    /// Show each operation's matrix and the running product
    Explain {
        /// Transform list as JSON5
        transform: String,

        /// Validation mode: strict checks, fast trusts input
        #[arg(long, value_enum)]
        mode: Option<BuildMode>,

        /// Round matrix entries to this many decimal places
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=15))]
        precision: Option<u32>,
    },
}

impl Commands {
    fn overrides(&self) -> CliOverrides {
        match self {
            Commands::Compile { mode, pretty, precision, .. } => CliOverrides {
                mode: *mode,
                pretty: if *pretty { Some(true) } else { None },
                precision: *precision,
            },
            Commands::Matrix { mode, precision, .. } | Commands::Explain { mode, precision, .. } => {
                CliOverrides { mode: *mode, pretty: None, precision: *precision }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Resolve configuration and fix the process-wide build mode.
fn prepare(cli: &Cli) -> Result<StyleformConfig, ExitCode> {
    let config = resolve_config(cli.config.as_deref(), &cli.command.overrides()).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;

    let mode = config.effective_mode();
    if let Err(existing) = BuildMode::install(mode) {
        log::warn!("build mode already resolved to {}, ignoring {}", existing, mode);
    }
    log::debug!("running in {} mode", BuildMode::current());
    Ok(config)
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match prepare(&cli) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match &cli.command {
        Commands::Compile { input, output, .. } => {
            compile::run_compile(input.as_deref(), output.as_deref(), &config)
        }
        Commands::Matrix { transform, grid, .. } => {
            matrix::run_matrix(transform, *grid, &config)
        }
        Commands::Explain { transform, .. } => matrix::run_explain(transform, &config),
    }
}

/// Round to `precision` decimal places, normalising negative zero.
pub(crate) fn round_to(value: f64, precision: Option<u32>) -> f64 {
    let Some(precision) = precision else {
        return value;
    };
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, Some(2)), 1.23);
        assert_eq!(round_to(-6.1e-17, Some(6)).to_bits(), 0.0f64.to_bits());
        assert_eq!(round_to(1.23456, None), 1.23456);
        assert!(round_to(f64::NAN, Some(3)).is_nan());
    }

    #[test]
    fn test_compile_overrides() {
        let cli = Cli::parse_from(["styleform", "compile", "--mode", "fast", "--precision", "3"]);
        let overrides = cli.command.overrides();
        assert_eq!(overrides.mode, Some(BuildMode::Fast));
        assert_eq!(overrides.pretty, None);
        assert_eq!(overrides.precision, Some(3));
    }

    #[test]
    fn test_matrix_args() {
        let cli = Cli::parse_from(["styleform", "-v", "matrix", "[]", "--grid"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Matrix { grid: true, .. }));
    }

    #[test]
    fn test_precision_range_enforced() {
        assert!(Cli::try_parse_from(["styleform", "matrix", "[]", "--precision", "16"]).is_err());
    }
}
