//! Orientation of a 3D selector object.
//!
//! The camera is fixed and looks down -Z with +Y up. Screen-space motion maps onto
//! world-space rotations, so orbit and roll are applied by premultiplication.

use glam::{DQuat, EulerRot};
use kurbo::Vec2;

use crate::config::REFERENCE_FPS;

/// Rotation state of the displayed object, with optional release momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Current rotation of the object in world space.
    pub rotation: DQuat,
    /// Orbit speed in rad/s: x spins about the world vertical, y about screen horizontal.
    pub angular_velocity: Vec2,
    /// Uniform scale. Pinch does not change it.
    pub scale: f64,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            angular_velocity: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Orientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate by `delta` radians: x about the world vertical axis, y about the
    /// screen-horizontal axis.
    pub fn orbit(&mut self, delta: Vec2) {
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            return;
        }
        let yaw = DQuat::from_rotation_y(delta.x);
        let pitch = DQuat::from_rotation_x(delta.y);
        self.rotation = (yaw * pitch * self.rotation).normalize();
    }

    /// Rotate about the camera's forward axis.
    ///
    /// `angle` is measured in screen space (y down), so a positive angle turns the
    /// object clockwise on screen, which is negative about +Z.
    pub fn roll(&mut self, angle: f64) {
        if !angle.is_finite() {
            return;
        }
        self.rotation = (DQuat::from_rotation_z(-angle) * self.rotation).normalize();
    }

    /// Start coasting at `velocity` rad/s, limited to `max` on each axis.
    pub fn set_momentum(&mut self, velocity: Vec2, max: f64) {
        let x = if velocity.x.is_finite() { velocity.x.clamp(-max, max) } else { 0.0 };
        let y = if velocity.y.is_finite() { velocity.y.clamp(-max, max) } else { 0.0 };
        self.angular_velocity = Vec2::new(x, y);
    }

    pub fn stop(&mut self) {
        self.angular_velocity = Vec2::ZERO;
    }

    pub fn is_coasting(&self) -> bool {
        self.angular_velocity != Vec2::ZERO
    }

    /// Advance momentum by `dt_seconds`. Returns true while still coasting.
    pub fn tick(&mut self, dt_seconds: f64, friction: f64, stop_threshold: f64) -> bool {
        if !(dt_seconds.is_finite() && dt_seconds > 0.0) || !self.is_coasting() {
            return self.is_coasting();
        }
        if self.angular_velocity.hypot() <= stop_threshold {
            self.stop();
            return false;
        }
        self.orbit(self.angular_velocity * dt_seconds);
        self.angular_velocity *= friction.powf(dt_seconds * REFERENCE_FPS);
        true
    }

    /// Rotation with a hover tilt toward `pointer` (normalized to `[-1, 1]`) on top.
    pub fn tilted(&self, pointer: Vec2, max_tilt: f64) -> DQuat {
        let yaw = DQuat::from_rotation_y(pointer.x * max_tilt);
        let pitch = DQuat::from_rotation_x(pointer.y * max_tilt);
        (yaw * pitch * self.rotation).normalize()
    }

    /// Yaw, pitch and roll in radians.
    pub fn euler(&self) -> (f64, f64, f64) {
        self.rotation.to_euler(EulerRot::YXZ)
    }

    /// Return to the identity rotation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_eq(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_orientation() {
        let orientation = Orientation::new();
        assert_eq!(orientation.rotation, DQuat::IDENTITY);
        assert!((orientation.scale - 1.0).abs() < f64::EPSILON);
        assert!(!orientation.is_coasting());
    }

    #[test]
    fn test_orbit_yaw() {
        let mut orientation = Orientation::new();
        orientation.orbit(Vec2::new(FRAC_PI_2, 0.0));
        // A quarter turn about +Y carries +X to -Z.
        assert_vec_eq(orientation.rotation * DVec3::X, DVec3::NEG_Z);
    }

    #[test]
    fn test_orbit_is_world_space() {
        let mut orientation = Orientation::new();
        orientation.orbit(Vec2::new(0.0, FRAC_PI_2));
        orientation.orbit(Vec2::new(FRAC_PI_2, 0.0));
        // The second yaw still spins about the world vertical, not the object's.
        assert_vec_eq(orientation.rotation * DVec3::Y, DVec3::X);
    }

    #[test]
    fn test_roll_is_clockwise_on_screen() {
        let mut orientation = Orientation::new();
        orientation.roll(FRAC_PI_2);
        assert_vec_eq(orientation.rotation * DVec3::Y, DVec3::X);
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut orientation = Orientation::new();
        orientation.orbit(Vec2::new(f64::NAN, 0.0));
        orientation.roll(f64::INFINITY);
        assert_eq!(orientation.rotation, DQuat::IDENTITY);
    }

    #[test]
    fn test_momentum_decays_and_stops() {
        let mut orientation = Orientation::new();
        orientation.set_momentum(Vec2::new(3.0, 0.0), 20.0);

        let mut frames = 0;
        while orientation.tick(1.0 / 60.0, 0.92, 0.01) {
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(!orientation.is_coasting());
        let (yaw, _, _) = orientation.euler();
        assert!(yaw.abs() > 0.1);
    }

    #[test]
    fn test_momentum_clamped() {
        let mut orientation = Orientation::new();
        orientation.set_momentum(Vec2::new(500.0, f64::NAN), 20.0);
        assert_eq!(orientation.angular_velocity, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_tilt_leaves_rotation_untouched() {
        let orientation = Orientation::new();
        let tilted = orientation.tilted(Vec2::new(1.0, 0.0), 0.15);
        assert!((tilted.angle_between(DQuat::IDENTITY) - 0.15).abs() < 1e-9);
        assert_eq!(orientation.rotation, DQuat::IDENTITY);
    }

    #[test]
    fn test_reset() {
        let mut orientation = Orientation::new();
        orientation.orbit(Vec2::new(0.3, 0.2));
        orientation.set_momentum(Vec2::new(1.0, 1.0), 20.0);
        orientation.reset();
        assert_eq!(orientation, Orientation::default());
    }
}
