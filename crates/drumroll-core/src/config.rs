//! Tunable parameters for the scroll engine, gesture classifier and orbit selector.
//!
//! All config types deserialize from JSON with every field optional, so a host can
//! override only the constants it cares about.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, require_positive};

/// Reference frame rate that friction and snap factors are expressed against.
pub const REFERENCE_FPS: f64 = 60.0;

/// How the scroll position behaves at the ends of the item range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Position is limited to `[0, (count - 1) * extent]` (sliders, flat lists).
    #[default]
    Clamped,
    /// Position wraps modulo `count * extent` (drums).
    Circular,
}

/// Screen axis that drives the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

/// How the host applies the scroll position to its presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Slide the item strip (DOM transform, pixels).
    #[default]
    Translate,
    /// Spin a cylinder about the scroll axis (3D drum, degrees).
    Rotate,
}

/// Physics constants for one scroll engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Distance between adjacent items, in pixels or degrees.
    pub item_extent: f64,
    /// Per-frame velocity multiplier at 60 fps.
    pub friction: f64,
    /// Scale applied to wheel deltas before they are added to velocity.
    pub wheel_sensitivity: f64,
    /// Upper bound on `|velocity|`, in units per second.
    pub max_velocity: f64,
    /// Below this speed the engine stops coasting and settles.
    pub stop_threshold: f64,
    /// Fraction of the remaining settle distance covered per 60 fps frame.
    pub snap_factor: f64,
    /// Settle distance under which the position snaps exactly.
    pub snap_epsilon: f64,
    /// Multiplier from pointer pixels to engine units while dragging.
    pub drag_factor: f64,
    pub bounds: BoundsMode,
    pub axis: Axis,
    pub presentation: Presentation,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            item_extent: 30.0,
            friction: 0.95,
            wheel_sensitivity: 0.5,
            max_velocity: 3000.0,
            stop_threshold: 0.1,
            snap_factor: 0.25,
            snap_epsilon: 0.05,
            drag_factor: 1.0,
            bounds: BoundsMode::Clamped,
            axis: Axis::Vertical,
            presentation: Presentation::Translate,
        }
    }
}

impl ScrollConfig {
    /// Flat list or slider: pixels per item, clamped at both ends.
    pub fn linear(item_extent: f64) -> Self {
        Self {
            item_extent,
            ..Self::default()
        }
    }

    /// iOS-style drum: pixels per item, wrapping around.
    pub fn drum(item_extent: f64) -> Self {
        Self {
            item_extent,
            friction: 0.94,
            bounds: BoundsMode::Circular,
            ..Self::default()
        }
    }

    /// 3D drum: the items share a full turn, so extent is in degrees.
    pub fn drum_3d(item_count: usize) -> Self {
        let item_extent = if item_count == 0 {
            0.0
        } else {
            360.0 / item_count as f64
        };
        Self {
            item_extent,
            friction: 0.93,
            wheel_sensitivity: 0.2,
            max_velocity: 1440.0,
            drag_factor: 0.5,
            bounds: BoundsMode::Circular,
            presentation: Presentation::Rotate,
            ..Self::default()
        }
    }

    /// Parse a JSON object and validate it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject constants that would put the engine in an undefined state.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.item_extent.is_finite() && self.item_extent > 0.0) {
            return Err(ConfigError::InvalidExtent(self.item_extent));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::InvalidFriction(self.friction));
        }
        require_positive("wheel_sensitivity", self.wheel_sensitivity)?;
        require_positive("max_velocity", self.max_velocity)?;
        require_positive("stop_threshold", self.stop_threshold)?;
        require_positive("snap_epsilon", self.snap_epsilon)?;
        require_positive("drag_factor", self.drag_factor)?;
        if !(self.snap_factor > 0.0 && self.snap_factor <= 1.0) {
            return Err(ConfigError::NonPositive {
                name: "snap_factor",
                value: self.snap_factor,
            });
        }
        Ok(())
    }
}

/// Thresholds for two-point gesture classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum dwell time in a classified state before re-evaluating.
    pub transition_cooldown_ms: f64,
    /// Pair-distance change, relative to the current distance, that counts as a pinch.
    pub pinch_threshold_ratio: f64,
    /// Pair-angle change, in radians, that counts as a twist.
    pub twist_threshold_rad: f64,
    /// Finger spacing used when synthesizing a pair from a trackpad gesture.
    pub trackpad_reference_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            transition_cooldown_ms: 200.0,
            pinch_threshold_ratio: 0.02,
            twist_threshold_rad: 0.02,
            trackpad_reference_distance: 100.0,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.transition_cooldown_ms.is_finite() && self.transition_cooldown_ms >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "transition_cooldown_ms",
                value: self.transition_cooldown_ms,
            });
        }
        require_positive("pinch_threshold_ratio", self.pinch_threshold_ratio)?;
        require_positive("twist_threshold_rad", self.twist_threshold_rad)?;
        require_positive("trackpad_reference_distance", self.trackpad_reference_distance)?;
        Ok(())
    }
}

/// Rotation constants for the 3D orbit selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Radians of rotation per pixel of pointer or swipe motion.
    pub rotate_sensitivity: f64,
    /// Per-frame angular velocity multiplier at 60 fps after a drag release.
    pub friction: f64,
    /// Angular speed (rad/s) under which momentum stops.
    pub stop_threshold: f64,
    /// Upper bound on angular speed (rad/s).
    pub max_angular_velocity: f64,
    /// Largest tilt (radians) toward the shared pointer while idle.
    pub hover_tilt: f64,
    pub gesture: GestureConfig,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.01,
            friction: 0.92,
            stop_threshold: 0.01,
            max_angular_velocity: 20.0,
            hover_tilt: 0.15,
            gesture: GestureConfig::default(),
        }
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("rotate_sensitivity", self.rotate_sensitivity)?;
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ConfigError::InvalidFriction(self.friction));
        }
        require_positive("stop_threshold", self.stop_threshold)?;
        require_positive("max_angular_velocity", self.max_angular_velocity)?;
        if !(self.hover_tilt.is_finite() && self.hover_tilt >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "hover_tilt",
                value: self.hover_tilt,
            });
        }
        self.gesture.validate()
    }
}
