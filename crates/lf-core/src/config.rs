//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON. Every section
//! defaults sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Compatibility level this parser guarantees before any action raises it.
pub const COMPATIBILITY_BASELINE: u32 = 6;

/// Job timeout applied when a description does not set `timeouts.job`.
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    /// Dispatcher configuration merged into job parameters when the caller
    /// does not pass one explicitly.
    pub dispatcher_config: Option<PathBuf>,
    /// Environment string exposed to the job as `env_dut`.
    pub env_dut: Option<String>,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Load configuration from a file, failing on any read or parse error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.parser.compatibility < COMPATIBILITY_BASELINE {
            warnings.push(format!(
                "parser.compatibility {} is below the built-in baseline {}; jobs written for this dispatcher may be rejected",
                self.parser.compatibility, COMPATIBILITY_BASELINE
            ));
        }

        if self.parser.default_job_timeout_secs == 0 {
            warnings.push("parser.default_job_timeout_secs is 0; jobs would time out immediately".into());
        }

        if let Some(ref path) = self.dispatcher_config {
            if !path.exists() {
                warnings.push(format!(
                    "dispatcher_config {} does not exist",
                    path.display()
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Job parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Compatibility floor of assembled jobs.
    pub compatibility: u32,
    pub default_job_timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            compatibility: COMPATIBILITY_BASELINE,
            default_job_timeout_secs: DEFAULT_JOB_TIMEOUT_SECS,
        }
    }
}
