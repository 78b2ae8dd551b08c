//! Two-point gesture disambiguation.
//!
//! Classifies the motion of two touch points (or one trackpad gesture) as a swipe, a
//! twist or a pinch. Once classified, the kind is held for a cooldown period so noisy
//! input cannot flap between kinds in the middle of one gesture.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::config::GestureConfig;
use crate::error::ConfigResult;
use crate::input::finite_point;

/// Pairs closer than this have no meaningful angle.
const MIN_PAIR_DISTANCE: f64 = 1e-6;

/// Current interpretation of pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GestureKind {
    /// No active gesture.
    #[default]
    None,
    /// Two points moving together.
    Swipe,
    /// Two points rotating about each other.
    Twist,
    /// Two points moving apart or together.
    Pinch,
    /// Single pointer held down. Not produced by the two-point classifier.
    Drag,
}

impl GestureKind {
    pub fn is_two_point(self) -> bool {
        matches!(self, Self::Swipe | Self::Twist | Self::Pinch)
    }
}

/// Geometry of a pair of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairMetrics {
    pub distance: f64,
    /// Angle of the vector from the first to the second point, in `(-π, π]`.
    pub angle: f64,
    pub midpoint: Point,
}

impl PairMetrics {
    /// Measure a pair. Returns `None` for non-finite or coincident points.
    pub fn from_points(p1: Point, p2: Point) -> Option<Self> {
        if !finite_point(p1) || !finite_point(p2) {
            return None;
        }
        let v = p2 - p1;
        let distance = v.hypot();
        if distance < MIN_PAIR_DISTANCE {
            return None;
        }
        Some(Self {
            distance,
            angle: v.atan2(),
            midpoint: p1.midpoint(p2),
        })
    }
}

/// Smallest signed rotation from `previous` to `current`, in `[-π, π)`.
pub fn signed_angle_delta(current: f64, previous: f64) -> f64 {
    (current - previous + PI).rem_euclid(TAU) - PI
}

/// What one two-point sample means for the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureUpdate {
    pub kind: GestureKind,
    /// Midpoint motion since the previous sample.
    pub pan: Vec2,
    /// Pair rotation since the previous sample, radians.
    pub angle_delta: f64,
    /// Pair distance ratio since the previous sample.
    pub scale: f64,
    /// Whether this sample changed the classification.
    pub transitioned: bool,
}

impl GestureUpdate {
    fn still(kind: GestureKind) -> Self {
        Self {
            kind,
            pan: Vec2::ZERO,
            angle_delta: 0.0,
            scale: 1.0,
            transitioned: false,
        }
    }
}

/// Per-widget gesture state machine.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    kind: GestureKind,
    touch_count: usize,
    /// Time of the last transition; re-arms the cooldown.
    start_time_ms: Option<f64>,
    last_update_ms: Option<f64>,
    /// Classification baseline, advanced only when a sample is evaluated.
    pinch_distance: Option<f64>,
    twist_angle: Option<f64>,
    /// Previous sample, for per-frame deltas.
    previous: Option<PairMetrics>,
    twist_accumulated: f64,
    pinch_accumulated: f64,
    pan_accumulated: Vec2,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            kind: GestureKind::None,
            touch_count: 0,
            start_time_ms: None,
            last_update_ms: None,
            pinch_distance: None,
            twist_angle: None,
            previous: None,
            twist_accumulated: 0.0,
            pinch_accumulated: 1.0,
            pan_accumulated: Vec2::ZERO,
        })
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn touch_count(&self) -> usize {
        self.touch_count
    }

    pub fn start_time_ms(&self) -> Option<f64> {
        self.start_time_ms
    }

    pub fn last_update_ms(&self) -> Option<f64> {
        self.last_update_ms
    }

    pub fn pinch_distance(&self) -> Option<f64> {
        self.pinch_distance
    }

    pub fn twist_angle(&self) -> Option<f64> {
        self.twist_angle
    }

    /// Rotation accumulated since entering the current twist.
    pub fn twist_accumulated(&self) -> f64 {
        self.twist_accumulated
    }

    /// Scale accumulated since entering the current pinch.
    pub fn pinch_accumulated(&self) -> f64 {
        self.pinch_accumulated
    }

    /// Midpoint travel accumulated since entering the current swipe.
    pub fn pan_accumulated(&self) -> Vec2 {
        self.pan_accumulated
    }

    /// The number of active touch points changed.
    ///
    /// Dropping below two ends any two-point gesture and clears its metrics.
    pub fn set_touch_count(&mut self, count: usize, timestamp_ms: f64) {
        self.touch_count = count;
        if count < 2 {
            if self.kind.is_two_point() || self.pinch_distance.is_some() {
                self.reset();
            }
        } else if self.kind == GestureKind::Drag {
            // A second finger landed mid-drag; the pair takes over.
            self.kind = GestureKind::None;
            self.start_time_ms = None;
        }
        if timestamp_ms.is_finite() {
            self.last_update_ms = Some(timestamp_ms);
        }
    }

    /// A single pointer went down with no pair active.
    pub fn begin_drag(&mut self, timestamp_ms: f64) {
        if self.kind == GestureKind::None && self.touch_count < 2 {
            self.kind = GestureKind::Drag;
            self.start_time_ms = timestamp_ms.is_finite().then_some(timestamp_ms);
        }
    }

    pub fn end_drag(&mut self) {
        if self.kind == GestureKind::Drag {
            self.kind = GestureKind::None;
            self.start_time_ms = None;
        }
    }

    /// Return to `None` and forget all pair metrics.
    pub fn reset(&mut self) {
        if self.kind != GestureKind::None {
            log::debug!("Gesture {:?} ended", self.kind);
        }
        self.kind = GestureKind::None;
        self.start_time_ms = None;
        self.pinch_distance = None;
        self.twist_angle = None;
        self.previous = None;
        self.clear_residuals();
    }

    /// Feed one sample of two touch points.
    pub fn update_pair(&mut self, p1: Point, p2: Point, timestamp_ms: f64) -> GestureUpdate {
        if self.touch_count < 2 {
            self.touch_count = 2;
        }
        if self.kind == GestureKind::Drag {
            self.kind = GestureKind::None;
            self.start_time_ms = None;
        }

        let Some(current) = PairMetrics::from_points(p1, p2) else {
            log::trace!("Dropping degenerate touch pair");
            return GestureUpdate::still(self.kind);
        };
        if !timestamp_ms.is_finite() {
            return GestureUpdate::still(self.kind);
        }
        self.last_update_ms = Some(timestamp_ms);

        let Some(previous) = self.previous.replace(current) else {
            self.pinch_distance = Some(current.distance);
            self.twist_angle = Some(current.angle);
            return GestureUpdate::still(self.kind);
        };

        let mut transitioned = false;
        if self.cooldown_elapsed(timestamp_ms) {
            let next = self.classify(&current);
            self.pinch_distance = Some(current.distance);
            self.twist_angle = Some(current.angle);
            if next != self.kind {
                self.transition(next, timestamp_ms);
                transitioned = true;
            }
        }

        let pan = current.midpoint - previous.midpoint;
        let angle_delta = signed_angle_delta(current.angle, previous.angle);
        let scale = current.distance / previous.distance;

        match self.kind {
            GestureKind::Swipe => self.pan_accumulated += pan,
            GestureKind::Twist => self.twist_accumulated += angle_delta,
            GestureKind::Pinch => self.pinch_accumulated *= scale,
            GestureKind::None | GestureKind::Drag => {}
        }

        GestureUpdate {
            kind: self.kind,
            pan,
            angle_delta,
            scale,
            transitioned,
        }
    }

    /// Feed one trackpad gesture sample as a synthetic pair centered on the origin.
    pub fn update_trackpad(
        &mut self,
        scale: f64,
        rotation_degrees: f64,
        timestamp_ms: f64,
    ) -> GestureUpdate {
        if !(scale.is_finite() && scale > 0.0 && rotation_degrees.is_finite()) {
            log::trace!("Dropping malformed trackpad gesture");
            return GestureUpdate::still(self.kind);
        }
        let half = self.config.trackpad_reference_distance * scale / 2.0;
        let angle = rotation_degrees.to_radians();
        let offset = Vec2::new(angle.cos(), angle.sin()) * half;
        self.update_pair(Point::ORIGIN - offset, Point::ORIGIN + offset, timestamp_ms)
    }

    fn cooldown_elapsed(&self, now_ms: f64) -> bool {
        match self.start_time_ms {
            None => true,
            Some(start) => now_ms - start >= self.config.transition_cooldown_ms,
        }
    }

    fn classify(&self, current: &PairMetrics) -> GestureKind {
        let base_distance = self.pinch_distance.unwrap_or(current.distance);
        let base_angle = self.twist_angle.unwrap_or(current.angle);

        let distance_change = (current.distance - base_distance).abs();
        let angle_change = signed_angle_delta(current.angle, base_angle).abs();

        let pinching = distance_change > current.distance * self.config.pinch_threshold_ratio;
        let twisting = angle_change > self.config.twist_threshold_rad;

        match (pinching, twisting) {
            (true, false) => GestureKind::Pinch,
            (false, true) => GestureKind::Twist,
            (true, true) => {
                if distance_change / current.distance > angle_change / PI {
                    GestureKind::Pinch
                } else {
                    GestureKind::Twist
                }
            }
            (false, false) => GestureKind::Swipe,
        }
    }

    fn transition(&mut self, next: GestureKind, timestamp_ms: f64) {
        log::debug!("Gesture {:?} -> {:?}", self.kind, next);
        self.kind = next;
        self.start_time_ms = Some(timestamp_ms);
        match next {
            GestureKind::Swipe => {
                self.twist_accumulated = 0.0;
                self.pinch_accumulated = 1.0;
            }
            GestureKind::Twist => {
                self.pinch_accumulated = 1.0;
                self.pan_accumulated = Vec2::ZERO;
            }
            GestureKind::Pinch => {
                self.twist_accumulated = 0.0;
                self.pan_accumulated = Vec2::ZERO;
            }
            GestureKind::None | GestureKind::Drag => self.clear_residuals(),
        }
    }

    fn clear_residuals(&mut self) {
        self.twist_accumulated = 0.0;
        self.pinch_accumulated = 1.0;
        self.pan_accumulated = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(distance: f64, angle: f64) -> (Point, Point) {
        let center = Point::new(200.0, 200.0);
        let half = Vec2::new(angle.cos(), angle.sin()) * (distance / 2.0);
        (center - half, center + half)
    }

    fn feed(classifier: &mut GestureClassifier, distance: f64, angle: f64, t: f64) -> GestureUpdate {
        let (p1, p2) = pair(distance, angle);
        classifier.update_pair(p1, p2, t)
    }

    fn classifier() -> GestureClassifier {
        let mut classifier = GestureClassifier::new(GestureConfig::default()).unwrap();
        classifier.set_touch_count(2, 0.0);
        classifier
    }

    #[test]
    fn test_first_sample_establishes_metrics() {
        let mut c = classifier();
        assert_eq!(c.pinch_distance(), None);

        let update = feed(&mut c, 100.0, 0.0, 0.0);
        assert_eq!(update.kind, GestureKind::None);
        assert!((c.pinch_distance().unwrap() - 100.0).abs() < 1e-9);
        assert!(c.twist_angle().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_twist_frozen_then_pinch() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);

        let update = feed(&mut c, 100.0, 0.1, 1_000.0);
        assert_eq!(update.kind, GestureKind::Twist);
        assert!(update.transitioned);

        // Within the cooldown the classification is frozen.
        let update = feed(&mut c, 130.0, 0.0, 1_050.0);
        assert_eq!(update.kind, GestureKind::Twist);
        assert!(!update.transitioned);

        // Cooldown elapsed: re-evaluated against the last evaluated sample.
        let update = feed(&mut c, 130.0, 0.0, 1_300.0);
        assert_eq!(update.kind, GestureKind::Pinch);
        assert!(update.transitioned);
    }

    #[test]
    fn test_steady_twist_stays_twist() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);

        let mut reached = false;
        for frame in 1..120 {
            let update = feed(&mut c, 100.0, frame as f64 * 0.05, frame as f64 * 16.0);
            if update.kind == GestureKind::Twist {
                reached = true;
            }
            if reached {
                assert_eq!(update.kind, GestureKind::Twist, "left twist at frame {frame}");
            }
        }
        assert!(reached);
    }

    #[test]
    fn test_still_pair_is_swipe() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.3, 0.0);
        let (p1, p2) = pair(100.0, 0.3);
        let update = c.update_pair(p1 + Vec2::new(12.0, 0.0), p2 + Vec2::new(12.0, 0.0), 16.0);

        assert_eq!(update.kind, GestureKind::Swipe);
        assert!((update.pan.x - 12.0).abs() < 1e-9);
        assert!((c.pan_accumulated().x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_both_significant_picks_larger_ratio() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);
        // 5% distance change vs 0.5 rad / π ≈ 16%
        let update = feed(&mut c, 105.0, 0.5, 16.0);
        assert_eq!(update.kind, GestureKind::Twist);

        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);
        // 50% distance change vs 0.03 rad / π ≈ 1%
        let update = feed(&mut c, 200.0, 0.03, 16.0);
        assert_eq!(update.kind, GestureKind::Pinch);
    }

    #[test]
    fn test_angle_change_wraps() {
        let mut c = classifier();
        feed(&mut c, 100.0, PI - 0.005, 0.0);
        // Crossing ±π is a 0.01 rad turn, not a 2π one.
        let update = feed(&mut c, 100.0, -PI + 0.005, 16.0);
        assert_eq!(update.kind, GestureKind::Swipe);
        assert!((update.angle_delta - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_follow_pair_presence() {
        let mut c = GestureClassifier::new(GestureConfig::default()).unwrap();
        assert_eq!(c.pinch_distance(), None);

        // A pair sample with no touch count reported implies two points.
        feed(&mut c, 80.0, 0.0, 0.0);
        assert_eq!(c.touch_count(), 2);
        assert!(c.pinch_distance().is_some());
        assert!(c.twist_angle().is_some());

        c.set_touch_count(3, 16.0);
        assert!(c.pinch_distance().is_some());

        c.set_touch_count(1, 32.0);
        assert_eq!(c.pinch_distance(), None);
        assert_eq!(c.twist_angle(), None);

        // Two points down but nothing measured yet.
        c.set_touch_count(2, 48.0);
        assert_eq!(c.pinch_distance(), None);
        feed(&mut c, 90.0, 0.4, 64.0);
        assert!((c.pinch_distance().unwrap() - 90.0).abs() < 1e-9);
        assert!((c.twist_angle().unwrap() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_touch_drop_resets() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);
        feed(&mut c, 100.0, 0.2, 16.0);
        assert_eq!(c.kind(), GestureKind::Twist);

        c.set_touch_count(1, 32.0);
        assert_eq!(c.kind(), GestureKind::None);
        assert_eq!(c.pinch_distance(), None);
        assert_eq!(c.twist_angle(), None);
        assert_eq!(c.twist_accumulated(), 0.0);

        // The next pair starts from scratch.
        c.set_touch_count(2, 40.0);
        let update = feed(&mut c, 150.0, 1.0, 48.0);
        assert_eq!(update.kind, GestureKind::None);
    }

    #[test]
    fn test_transition_clears_residuals() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);
        feed(&mut c, 100.0, 0.2, 16.0);
        feed(&mut c, 100.0, 0.3, 32.0);
        assert!((c.twist_accumulated() - 0.3).abs() < 1e-9);

        // First evaluation after the cooldown still sees the frozen rotation.
        let update = feed(&mut c, 100.0, 0.3, 500.0);
        assert_eq!(update.kind, GestureKind::Twist);
        assert!((c.twist_accumulated() - 0.3).abs() < 1e-9);

        // Fingers held still: swipe clears the twist residue.
        let update = feed(&mut c, 100.0, 0.3, 516.0);
        assert_eq!(update.kind, GestureKind::Swipe);
        assert_eq!(c.twist_accumulated(), 0.0);
    }

    #[test]
    fn test_degenerate_pair_ignored() {
        let mut c = classifier();
        feed(&mut c, 100.0, 0.0, 0.0);
        let update = c.update_pair(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 16.0);
        assert_eq!(update, GestureUpdate::still(GestureKind::None));

        let update = c.update_pair(Point::new(f64::NAN, 5.0), Point::new(5.0, 5.0), 32.0);
        assert_eq!(update.kind, GestureKind::None);
        assert!((c.pinch_distance().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_trackpad_rotation_is_twist() {
        let mut c = GestureClassifier::new(GestureConfig::default()).unwrap();
        c.update_trackpad(1.0, 0.0, 0.0);
        let update = c.update_trackpad(1.0, 10.0, 16.0);
        assert_eq!(update.kind, GestureKind::Twist);
        assert!((update.angle_delta - 10f64.to_radians()).abs() < 1e-9);

        assert_eq!(
            c.update_trackpad(f64::NAN, 0.0, 32.0).kind,
            GestureKind::Twist
        );
    }

    #[test]
    fn test_drag_state() {
        let mut c = GestureClassifier::new(GestureConfig::default()).unwrap();
        c.set_touch_count(1, 0.0);
        c.begin_drag(0.0);
        assert_eq!(c.kind(), GestureKind::Drag);

        // Second finger lands: the pair takes over from the drag.
        c.set_touch_count(2, 10.0);
        assert_eq!(c.kind(), GestureKind::None);

        c.set_touch_count(0, 20.0);
        c.begin_drag(30.0);
        c.end_drag();
        assert_eq!(c.kind(), GestureKind::None);
    }
}
