//! Strict and fast compilation modes
//!
//! Strict mode validates every transform operation and freezes compiled
//! styles. Fast mode skips both. The process-wide mode is resolved once,
//! on first use or by an explicit [`BuildMode::install`] at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variable selecting the process-wide mode.
pub const MODE_ENV_VAR: &str = "STYLEFORM_MODE";

static PROCESS_MODE: OnceLock<BuildMode> = OnceLock::new();

/// How much checking the compiler does.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Validate operations and freeze results (development builds)
    Strict,
    /// Trust the input; no validation, no freezing (production builds)
    Fast,
}

/// Error for an unrecognised mode name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown build mode '{0}' (expected 'strict' or 'fast')")]
pub struct ModeParseError(pub String);

impl BuildMode {
    /// Mode implied by the compilation profile: strict with debug assertions.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Strict
        } else {
            BuildMode::Fast
        }
    }

    /// Mode named by `STYLEFORM_MODE`, if set and valid.
    ///
    /// An invalid value is logged and ignored.
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(MODE_ENV_VAR).ok()?;
        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                log::warn!("ignoring {}: {}", MODE_ENV_VAR, e);
                None
            }
        }
    }

    /// The process-wide mode.
    ///
    /// Resolved on first call from `STYLEFORM_MODE`, falling back to
    /// [`BuildMode::build_default`], unless [`BuildMode::install`] ran first.
    pub fn current() -> Self {
        *PROCESS_MODE.get_or_init(|| {
            let mode = Self::from_env().unwrap_or_else(Self::build_default);
            log::debug!("build mode resolved to {}", mode);
            mode
        })
    }

    /// Fix the process-wide mode.
    ///
    /// Returns `Err` with the already-resolved mode if it was set before.
    pub fn install(mode: BuildMode) -> Result<(), BuildMode> {
        PROCESS_MODE.set(mode).map_err(|_| Self::current())
    }

    /// Whether operations are validated before being applied
    pub fn validates(self) -> bool {
        self == BuildMode::Strict
    }

    /// Whether compiled styles are frozen
    pub fn freezes(self) -> bool {
        self == BuildMode::Strict
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Strict => write!(f, "strict"),
            BuildMode::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" | "dev" | "development" => Ok(BuildMode::Strict),
            "fast" | "prod" | "production" => Ok(BuildMode::Fast),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("strict".parse(), Ok(BuildMode::Strict));
        assert_eq!("Development".parse(), Ok(BuildMode::Strict));
        assert_eq!(" fast ".parse(), Ok(BuildMode::Fast));
        assert_eq!("prod".parse(), Ok(BuildMode::Fast));
        assert_eq!("loose".parse::<BuildMode>(), Err(ModeParseError("loose".to_string())));
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [BuildMode::Strict, BuildMode::Fast] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }

    #[test]
    fn test_gates() {
        assert!(BuildMode::Strict.validates());
        assert!(BuildMode::Strict.freezes());
        assert!(!BuildMode::Fast.validates());
        assert!(!BuildMode::Fast.freezes());
    }

    #[test]
    fn test_build_default_follows_debug_assertions() {
        let expected = if cfg!(debug_assertions) { BuildMode::Strict } else { BuildMode::Fast };
        assert_eq!(BuildMode::build_default(), expected);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(MODE_ENV_VAR, "fast");
        assert_eq!(BuildMode::from_env(), Some(BuildMode::Fast));

        std::env::set_var(MODE_ENV_VAR, "nonsense");
        assert_eq!(BuildMode::from_env(), None);

        std::env::remove_var(MODE_ENV_VAR);
        assert_eq!(BuildMode::from_env(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let mode: BuildMode = serde_json::from_str("\"fast\"").unwrap();
        assert_eq!(mode, BuildMode::Fast);
        assert_eq!(serde_json::to_string(&BuildMode::Strict).unwrap(), "\"strict\"");
    }

    #[test]
    fn test_install_is_sticky() {
        let first = BuildMode::current();
        let other = if first == BuildMode::Strict { BuildMode::Fast } else { BuildMode::Strict };
        assert_eq!(BuildMode::install(other), Err(first));
        assert_eq!(BuildMode::current(), first);
    }
}
