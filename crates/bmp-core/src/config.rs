use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "BMP_CONFIG_PATH";
/// Configuration file read when `BMP_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "bmp.toml";
/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "bmp=info";

/// `[logging]` section.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}

/// `[load_rates]` section.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoadRatesConfig {
    /// JSON array of load-rate rows. Without it the store is empty and the
    /// segment-weighted calculators report zero.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Average segment rates on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel_lookups: bool,
}

impl Default for LoadRatesConfig {
    fn default() -> Self {
        Self { path: None, parallel_lookups: true }
    }
}

/// `[output]` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Decimal places applied to printed results; unrounded when absent.
    #[serde(default)]
    pub precision: Option<u32>,
}

/// Engine and CLI settings read from `bmp.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub load_rates: LoadRatesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl EngineConfig {
    /// Load from `$BMP_CONFIG_PATH`, falling back to `bmp.toml`.
    pub fn load() -> EngineResult<Self> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// Load from `path` and apply environment overrides. A missing file
    /// yields the defaults; a malformed one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(_) => {
                warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                );
                Self::default()
            }
        };
        Ok(config.apply_env_overrides())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|err| EngineError::configuration("config", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides for individual settings.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("BMP_LOAD_RATES_PATH") {
            info!(path = %path, "load rate path overridden from environment");
            self.load_rates.path = Some(PathBuf::from(path));
        }
        if let Ok(parallel) = std::env::var("BMP_PARALLEL_LOOKUPS") {
            if let Ok(parallel) = parallel.parse::<bool>() {
                self.load_rates.parallel_lookups = parallel;
            }
        }
        if let Ok(precision) = std::env::var("BMP_OUTPUT_PRECISION") {
            if let Ok(precision) = precision.parse::<u32>() {
                self.output.precision = Some(precision);
            }
        }
        self
    }

    fn validate(&self) -> EngineResult<()> {
        if let Some(precision) = self.output.precision {
            if precision > 15 {
                return Err(EngineError::configuration(
                    "output.precision",
                    format!("precision {precision} exceeds 15 decimal places"),
                ));
            }
        }
        if self.logging.filter.trim().is_empty() {
            return Err(EngineError::configuration("logging.filter", "filter must not be empty"));
        }
        Ok(())
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_true() -> bool {
    true
}
