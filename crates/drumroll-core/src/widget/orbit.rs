//! 3D object selector driven by drags and two-point gestures.
//!
//! Gesture mapping:
//! - single-pointer drag orbits the object and coasts on release
//! - two-point swipe orbits the object without momentum
//! - twist rolls the object about the view axis
//! - pinch is recognized but does not change the object

use glam::{DMat4, DQuat, DVec3};
use kurbo::{Point, Vec2};
use std::rc::Rc;

use super::{HandlerTable, Widget, WidgetId, WidgetState};
use crate::config::OrbitConfig;
use crate::error::ConfigResult;
use crate::gesture::{GestureClassifier, GestureKind, GestureUpdate};
use crate::input::{EventKind, InputEvent, SharedPointer, finite_point};
use crate::orientation::Orientation;
use crate::velocity::VelocitySampler;

/// What the renderer needs to draw the object this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRenderState {
    pub rotation: DQuat,
    pub scale: f64,
    pub gesture: GestureKind,
}

impl OrbitRenderState {
    /// Model matrix for the renderer.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(DVec3::splat(self.scale), self.rotation, DVec3::ZERO)
    }
}

#[derive(Debug)]
pub struct OrbitSelector {
    id: WidgetId,
    config: OrbitConfig,
    orientation: Orientation,
    gesture: GestureClassifier,
    /// Hover target for the idle tilt.
    pointer: Option<SharedPointer>,
    handlers: Rc<HandlerTable<Self>>,
    /// Last pointer position during a single-pointer drag.
    anchor: Option<Point>,
    sampler_x: VelocitySampler,
    sampler_y: VelocitySampler,
    /// A trackpad gesture owns the classifier until a touch count or press ends it.
    trackpad_active: bool,
    destroyed: bool,
}

impl OrbitSelector {
    pub fn new(config: OrbitConfig) -> ConfigResult<Self> {
        config.validate()?;
        let gesture = GestureClassifier::new(config.gesture.clone())?;

        let handlers = HandlerTable::new()
            .with(EventKind::Motion, Self::on_motion)
            .with(EventKind::Press, Self::on_press)
            .with(EventKind::PointerMove, Self::on_pointer_move)
            .with(EventKind::TouchCount, Self::on_touch_count)
            .with(EventKind::TwoPoint, Self::on_two_point)
            .with(EventKind::Trackpad, Self::on_trackpad);

        Ok(Self {
            id: WidgetId::new_v4(),
            config,
            orientation: Orientation::new(),
            gesture,
            pointer: None,
            handlers: Rc::new(handlers),
            anchor: None,
            sampler_x: VelocitySampler::new(),
            sampler_y: VelocitySampler::new(),
            trackpad_active: false,
            destroyed: false,
        })
    }

    /// Tilt toward the shared pointer while idle.
    pub fn with_pointer(mut self, pointer: SharedPointer) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn gesture(&self) -> &GestureClassifier {
        &self.gesture
    }

    /// Return to the identity rotation and drop any momentum.
    pub fn reset_orientation(&mut self) {
        if !self.destroyed {
            self.orientation.reset();
        }
    }

    pub fn render_state(&self) -> OrbitRenderState {
        let rotation = match self.hover() {
            Some(pointer) if self.state() == WidgetState::Idle => {
                self.orientation.tilted(pointer, self.config.hover_tilt)
            }
            _ => self.orientation.rotation,
        };
        OrbitRenderState {
            rotation,
            scale: self.orientation.scale,
            gesture: self.gesture.kind(),
        }
    }

    fn hover(&self) -> Option<Vec2> {
        if self.config.hover_tilt <= 0.0 {
            return None;
        }
        let pointer = self.pointer.as_ref()?;
        let tracker = pointer.try_borrow().ok()?;
        Some(tracker.snapshot().normalized())
    }

    fn sensitivity(&self) -> f64 {
        self.config.rotate_sensitivity
    }

    fn start_drag(&mut self, timestamp_ms: f64) {
        self.gesture.begin_drag(timestamp_ms);
        self.orientation.stop();
        self.sampler_x.reset(timestamp_ms);
        self.sampler_y.reset(timestamp_ms);
    }

    fn finish_drag(&mut self, timestamp_ms: f64) {
        if self.gesture.kind() == GestureKind::Drag && self.anchor.is_some() {
            let velocity = Vec2::new(
                self.sampler_x.velocity(timestamp_ms),
                self.sampler_y.velocity(timestamp_ms),
            ) * self.sensitivity();
            self.orientation
                .set_momentum(velocity, self.config.max_angular_velocity);
        }
        self.gesture.end_drag();
        self.anchor = None;
        self.sampler_x.clear();
        self.sampler_y.clear();
    }

    fn apply_gesture(&mut self, update: GestureUpdate) {
        if update.transitioned {
            self.orientation.stop();
        }
        match update.kind {
            GestureKind::Swipe => self.orientation.orbit(update.pan * self.sensitivity()),
            GestureKind::Twist => self.orientation.roll(update.angle_delta),
            GestureKind::Pinch => log::trace!("Pinch scale {:.3} ignored", update.scale),
            GestureKind::None | GestureKind::Drag => {}
        }
    }

    fn on_motion(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Motion { delta, .. } = *event else {
            return false;
        };
        if !delta.y.is_finite() {
            return false;
        }
        self.orientation.stop();
        self.orientation
            .orbit(Vec2::new(delta.y * self.sensitivity(), 0.0));
        true
    }

    fn on_press(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Press {
            pressed,
            position,
            timestamp_ms,
        } = *event
        else {
            return false;
        };
        if !pressed {
            self.finish_drag(timestamp_ms);
            return true;
        }
        // Trackpads report no lift; a press means the gesture is over.
        if self.trackpad_active {
            self.trackpad_active = false;
            self.gesture.set_touch_count(0, timestamp_ms);
        }
        if !finite_point(position) || self.gesture.touch_count() >= 2 {
            return false;
        }
        self.start_drag(timestamp_ms);
        if self.gesture.kind() != GestureKind::Drag {
            return false;
        }
        self.anchor = Some(position);
        true
    }

    fn on_pointer_move(&mut self, event: &InputEvent) -> bool {
        let InputEvent::PointerMove {
            position,
            timestamp_ms,
        } = *event
        else {
            return false;
        };
        if self.gesture.kind() != GestureKind::Drag || !finite_point(position) {
            return false;
        }
        // After a pair collapses to one finger, the first move only re-anchors.
        let Some(anchor) = self.anchor.replace(position) else {
            return true;
        };
        let delta = position - anchor;
        self.orientation.orbit(delta * self.sensitivity());
        self.sampler_x.push(timestamp_ms, delta.x);
        self.sampler_y.push(timestamp_ms, delta.y);
        true
    }

    fn on_touch_count(&mut self, event: &InputEvent) -> bool {
        let InputEvent::TouchCount {
            count,
            timestamp_ms,
        } = *event
        else {
            return false;
        };
        let was_pair = self.gesture.touch_count() >= 2 || self.gesture.kind().is_two_point();
        self.trackpad_active = false;

        if count == 0 {
            self.gesture.set_touch_count(0, timestamp_ms);
            self.finish_drag(timestamp_ms);
            return true;
        }

        self.gesture.set_touch_count(count, timestamp_ms);
        if count >= 2 {
            self.anchor = None;
            self.orientation.stop();
            self.sampler_x.clear();
            self.sampler_y.clear();
        } else if was_pair {
            self.anchor = None;
            self.start_drag(timestamp_ms);
        }
        true
    }

    fn on_two_point(&mut self, event: &InputEvent) -> bool {
        let InputEvent::TwoPoint {
            p1,
            p2,
            timestamp_ms,
        } = *event
        else {
            return false;
        };
        self.anchor = None;
        let update = self.gesture.update_pair(p1, p2, timestamp_ms);
        self.apply_gesture(update);
        true
    }

    /// Trackpad gestures have no touch count; the host ends them with a zero count
    /// or the next press does.
    fn on_trackpad(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Trackpad {
            scale,
            rotation_degrees,
            timestamp_ms,
        } = *event
        else {
            return false;
        };
        self.anchor = None;
        self.trackpad_active = true;
        let update = self
            .gesture
            .update_trackpad(scale, rotation_degrees, timestamp_ms);
        self.apply_gesture(update);
        true
    }
}

impl Widget for OrbitSelector {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn handle_event(&mut self, event: &InputEvent) -> bool {
        if self.destroyed {
            return false;
        }
        let handlers = Rc::clone(&self.handlers);
        handlers.dispatch(self, event)
    }

    fn tick(&mut self, dt_seconds: f64) {
        if self.destroyed || self.gesture.kind() != GestureKind::None {
            return;
        }
        self.orientation.tick(
            dt_seconds,
            self.config.friction,
            self.config.stop_threshold,
        );
    }

    fn state(&self) -> WidgetState {
        if self.destroyed {
            WidgetState::Destroyed
        } else if self.gesture.kind() != GestureKind::None {
            WidgetState::Interacting(self.gesture.kind())
        } else if self.orientation.is_coasting() {
            WidgetState::Animating
        } else {
            WidgetState::Idle
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.pointer = None;
        self.anchor = None;
        self.trackpad_active = false;
        self.gesture.reset();
        self.orientation.stop();
        self.sampler_x.clear();
        self.sampler_y.clear();
    }
}
