//! Configuration schema types for `styleform.toml`
//!
//! Defines the structure and validation rules for styleform configuration.

use serde::{Deserialize, Serialize};

use crate::mode::BuildMode;

/// Largest rounding precision accepted for matrix output
pub const MAX_PRECISION: u32 = 15;

/// Compilation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Strict or fast; unset means the build profile decides
    #[serde(default)]
    pub mode: Option<BuildMode>,
}

/// Output formatting for the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
    /// Round matrix entries to this many decimal places
    #[serde(default)]
    pub precision: Option<u32>,
}

/// Root configuration structure for `styleform.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleformConfig {
    #[serde(default)]
    pub compile: CompileConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A single configuration validation problem
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "output.precision")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "styleform.toml: '{}' {}", self.field, self.message)
    }
}

impl StyleformConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Some(precision) = self.output.precision {
            if precision > MAX_PRECISION {
                errors.push(ConfigValidationError {
                    field: "output.precision".to_string(),
                    message: format!("must be at most {}", MAX_PRECISION),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Mode to compile with: configured value or the build default
    pub fn effective_mode(&self) -> BuildMode {
        self.compile.mode.unwrap_or_else(BuildMode::build_default)
    }
}
