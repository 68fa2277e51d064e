//! Configuration for the compatibility engine
//!
//! Reads configuration from:
//! - `.pccompat.yaml` / `.pccompat.yml` / `.pccompat.json` (project-level)
//! - the same names in the home directory (user-level)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// GPU-to-clearance distance at or below which a fit is reported as tight
pub const DEFAULT_GPU_FIT_MARGIN_MM: u32 = 20;

/// Recommended PSU capacity as a percentage of estimated draw (1.2x)
pub const DEFAULT_PSU_HEADROOM_PERCENT: u32 = 120;

/// Recommended PSU wattage is rounded up to a multiple of this
pub const DEFAULT_PSU_ROUNDING_STEP_W: u32 = 50;

/// Allowance for motherboard, RAM, storage and fans
pub const DEFAULT_BASE_SYSTEM_DRAW_W: u32 = 100;

/// Connector name marking the newest high-power GPU cable
pub const DEFAULT_HIGH_POWER_CONNECTOR: &str = "16-pin";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Rule thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gpu_fit_margin_mm: u32,
    pub psu_headroom_percent: u32,
    pub psu_rounding_step_w: u32,
    pub base_system_draw_w: u32,
    pub high_power_connector: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gpu_fit_margin_mm: DEFAULT_GPU_FIT_MARGIN_MM,
            psu_headroom_percent: DEFAULT_PSU_HEADROOM_PERCENT,
            psu_rounding_step_w: DEFAULT_PSU_ROUNDING_STEP_W,
            base_system_draw_w: DEFAULT_BASE_SYSTEM_DRAW_W,
            high_power_connector: DEFAULT_HIGH_POWER_CONNECTOR.to_string(),
        }
    }
}

/// Rule selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids to skip (e.g. "cooler-case")
    pub disabled: Vec<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: ColorMode,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub rules: RulesConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file, choosing the parser by extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [".pccompat.yaml", ".pccompat.yml", ".pccompat.json"];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Reject thresholds the rules cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.psu_headroom_percent < 100 {
            return Err(ConfigError::Invalid(format!(
                "psu_headroom_percent must be at least 100, got {}",
                self.engine.psu_headroom_percent
            )));
        }
        if self.engine.psu_rounding_step_w == 0 {
            return Err(ConfigError::Invalid(
                "psu_rounding_step_w must be greater than 0".to_string(),
            ));
        }
        if self.engine.high_power_connector.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "high_power_connector must not be empty".to_string(),
            ));
        }
        for id in &self.rules.disabled {
            if crate::rules::find_rule(id).is_none() {
                return Err(ConfigError::Invalid(format!("Unknown rule: {}", id)));
            }
        }
        Ok(())
    }
}
