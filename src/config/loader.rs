//! Configuration loading and discovery for `styleform.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::StyleformConfig;
use crate::mode::BuildMode;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "styleform.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse styleform.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override compile mode
    pub mode: Option<BuildMode>,
    /// Override pretty printing
    pub pretty: Option<bool>,
    /// Override matrix rounding
    pub precision: Option<u32>,
}

/// Candidate config locations, nearest first: `styleform.toml` in `start`
/// and each of its ancestors, then the user config directory.
pub fn config_candidates(start: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> =
        start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).collect();
    candidates.extend(user_config_path());
    candidates
}

/// `$XDG_CONFIG_HOME/styleform/styleform.toml`, falling back to
/// `$HOME/.config` when XDG is unset.
fn user_config_path() -> Option<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("styleform").join(CONFIG_FILE_NAME))
}

/// First existing config file among [`config_candidates`] of `start`.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    config_candidates(start).into_iter().find(|path| path.is_file())
}

/// Read and validate the configuration.
///
/// An explicit `path` must exist. Without one the file is discovered from
/// the working directory; if none is found the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<StyleformConfig, ConfigError> {
    let found = match path {
        Some(path) => Some(path.to_path_buf()),
        None => env::current_dir().ok().and_then(|cwd| discover_config(&cwd)),
    };
    let Some(path) = found else {
        log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
        return Ok(StyleformConfig::default());
    };

    log::debug!("loading config from {}", path.display());
    let config: StyleformConfig = toml::from_str(&fs::read_to_string(&path)?)?;
    checked(config)
}

fn checked(config: StyleformConfig) -> Result<StyleformConfig, ConfigError> {
    let errors: Vec<String> = config.validate().iter().map(ToString::to_string).collect();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

/// Apply `STYLEFORM_MODE` on top of the file configuration.
pub fn apply_env_overrides(config: &mut StyleformConfig) {
    if let Some(mode) = BuildMode::from_env() {
        config.compile.mode = Some(mode);
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file and environment values.
pub fn merge_cli_overrides(config: &mut StyleformConfig, overrides: &CliOverrides) {
    if let Some(mode) = overrides.mode {
        config.compile.mode = Some(mode);
    }

    if let Some(pretty) = overrides.pretty {
        config.output.pretty = pretty;
    }

    if let Some(precision) = overrides.precision {
        config.output.precision = Some(precision);
    }
}

/// Load, then layer environment and CLI overrides, in that order.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<StyleformConfig, ConfigError> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config);
    merge_cli_overrides(&mut config, overrides);
    checked(config)
}
