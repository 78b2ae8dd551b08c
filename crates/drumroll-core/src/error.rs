//! Configuration errors surfaced at construction time.

use thiserror::Error;

/// Errors raised when a selector or engine is set up with invalid parameters.
///
/// These are fatal to construction. Transient input anomalies (non-finite deltas,
/// degenerate touch geometry) never surface here; they are dropped where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Option list is empty")]
    EmptyOptions,
    #[error("Item count must be positive")]
    NoItems,
    #[error("Item extent must be a positive finite number, got {0}")]
    InvalidExtent(f64),
    #[error("Friction must lie strictly between 0 and 1, got {0}")]
    InvalidFriction(f64),
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("Index {index} is out of range for {count} items")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("Invalid configuration JSON: {0}")]
    Parse(String),
}

/// Result type for configuration and construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Check that a tunable is a positive finite number.
pub(crate) fn require_positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
