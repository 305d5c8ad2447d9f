//! Configuration file support for Onyx.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/onyx/config.toml`.

use crate::plates::{default_bar_weight, default_denominations};
use crate::{DistanceUnit, Error, MeasureUnit, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub plates: PlatesConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Unit systems
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UnitsConfig {
    #[serde(default)]
    pub weight: WeightUnit,

    #[serde(default)]
    pub measure: MeasureUnit,

    #[serde(default)]
    pub distance: DistanceUnit,
}

/// Plate calculator overrides. Unset fields follow the weight unit.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PlatesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denominations: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_weight: Option<f64>,
}

/// Display toggles
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_confetti: bool,

    #[serde(default = "default_true")]
    pub show_body_weight: bool,

    #[serde(default = "default_true")]
    pub show_measurements: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_confetti: true,
            show_body_weight: true,
            show_measurements: true,
        }
    }
}

/// Rest timer quick-add increments, in seconds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_timer_increments")]
    pub increments: Vec<u32>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            increments: default_timer_increments(),
        }
    }
}

/// Data layer retry policy
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("onyx")
}

fn default_true() -> bool {
    true
}

fn default_timer_increments() -> Vec<u32> {
    vec![30, 60, 90]
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("onyx").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject plate settings the solver cannot use
    pub fn validate(&self) -> Result<()> {
        if let Some(denominations) = &self.plates.denominations {
            if denominations.is_empty() {
                return Err(Error::Config("plates.denominations must not be empty".into()));
            }
            if let Some(bad) = denominations.iter().find(|d| !d.is_finite() || **d <= 0.0) {
                return Err(Error::Config(format!(
                    "plates.denominations must be positive, got {}",
                    bad
                )));
            }
        }
        if let Some(bar) = self.plates.bar_weight {
            if !bar.is_finite() || bar < 0.0 {
                return Err(Error::Config(format!(
                    "plates.bar_weight must be non-negative, got {}",
                    bar
                )));
            }
        }
        Ok(())
    }

    /// Plate denominations in use, heaviest first
    pub fn plate_denominations(&self) -> Vec<f64> {
        let mut plates = self
            .plates
            .denominations
            .clone()
            .unwrap_or_else(|| default_denominations(self.units.weight).to_vec());
        plates.sort_by(|a, b| b.total_cmp(a));
        plates
    }

    /// Bar weight in use
    pub fn bar_weight(&self) -> f64 {
        self.plates
            .bar_weight
            .unwrap_or_else(|| default_bar_weight(self.units.weight))
    }
}
