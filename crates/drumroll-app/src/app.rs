//! Application configuration.

use std::path::Path;

use drumroll_core::{ConfigError, OptionList, ScrollConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::demo::ScriptStep;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Host configuration, loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Fixed tick rate of the native frame loop.
    pub frame_rate: f64,
    /// Option labels, in display order.
    pub labels: Vec<String>,
    /// Initially selected label. Defaults to the first one.
    pub initial: Option<String>,
    pub scroll: ScrollConfig,
    /// Input replayed by the native demo.
    pub script: Vec<ScriptStep>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let labels = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        Self {
            title: "Drumroll".to_string(),
            frame_rate: 60.0,
            labels: labels.iter().map(|label| label.to_string()).collect(),
            initial: None,
            scroll: ScrollConfig::drum(30.0),
            script: ScriptStep::default_script(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "frame_rate",
                value: self.frame_rate,
            });
        }
        if self.labels.is_empty() {
            return Err(ConfigError::EmptyOptions);
        }
        self.scroll.validate()
    }

    pub fn options(&self) -> Result<OptionList<String>, ConfigError> {
        OptionList::from_labels(self.labels.iter().cloned())
    }

    /// The initial label, falling back to the first option.
    pub fn initial_label(&self) -> &str {
        self.initial
            .as_deref()
            .or_else(|| self.labels.first().map(String::as_str))
            .unwrap_or_default()
    }

    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }
}
