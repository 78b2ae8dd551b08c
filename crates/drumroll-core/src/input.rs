//! Normalized input events and the shared pointer tracker.
//!
//! Hosts translate platform events (DOM pointer/touch/wheel, winit, ...) into
//! [`InputEvent`] before handing them to a selector.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Where a scroll delta came from. Decides between the impulse and tracking models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpulseSource {
    /// Mouse wheel or trackpad scroll: adds to velocity.
    Wheel,
    /// Finger movement while touching: moves position 1:1.
    Touch,
    /// Mouse/pen movement while pressed: moves position 1:1.
    Drag,
}

/// A platform-independent input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputEvent {
    /// Wheel or trackpad scroll.
    Motion { delta: Vec2, timestamp_ms: f64 },
    /// Pointer or first finger pressed/released.
    Press {
        pressed: bool,
        position: Point,
        timestamp_ms: f64,
    },
    /// Pointer or first finger moved.
    PointerMove { position: Point, timestamp_ms: f64 },
    /// Number of active touch points changed.
    TouchCount { count: usize, timestamp_ms: f64 },
    /// Two active touch points moved.
    TwoPoint {
        p1: Point,
        p2: Point,
        timestamp_ms: f64,
    },
    /// Trackpad gesture (Safari-style `gesturechange`).
    Trackpad {
        scale: f64,
        rotation_degrees: f64,
        timestamp_ms: f64,
    },
}

/// Discriminant of [`InputEvent`], used as a dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Motion,
    Press,
    PointerMove,
    TouchCount,
    TwoPoint,
    Trackpad,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Motion { .. } => EventKind::Motion,
            InputEvent::Press { .. } => EventKind::Press,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::TouchCount { .. } => EventKind::TouchCount,
            InputEvent::TwoPoint { .. } => EventKind::TwoPoint,
            InputEvent::Trackpad { .. } => EventKind::Trackpad,
        }
    }

    pub fn timestamp_ms(&self) -> f64 {
        match *self {
            InputEvent::Motion { timestamp_ms, .. }
            | InputEvent::Press { timestamp_ms, .. }
            | InputEvent::PointerMove { timestamp_ms, .. }
            | InputEvent::TouchCount { timestamp_ms, .. }
            | InputEvent::TwoPoint { timestamp_ms, .. }
            | InputEvent::Trackpad { timestamp_ms, .. } => timestamp_ms,
        }
    }
}

pub(crate) fn finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Process-wide pointer position, shared read-only with widgets that need it.
///
/// The host owns the tracker, feeds it pointer events and hands clones of the
/// [`SharedPointer`] handle to widgets. Widgets only read snapshots.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    /// Last pointer position in viewport coordinates.
    position: Point,
    viewport: Size,
}

/// Handle to the shared pointer tracker.
pub type SharedPointer = Rc<RefCell<PointerTracker>>;

/// Point-in-time view of the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSnapshot {
    pub position: Point,
    pub viewport: Size,
}

impl PointerSnapshot {
    /// Position mapped to `[-1, 1]` on both axes, centered on the viewport.
    pub fn normalized(&self) -> Vec2 {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Vec2::ZERO;
        }
        let x = self.position.x / self.viewport.width * 2.0 - 1.0;
        let y = self.position.y / self.viewport.height * 2.0 - 1.0;
        Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
    }
}

impl PointerTracker {
    /// A tracker resting at the center of `viewport`.
    pub fn new(viewport: Size) -> Self {
        Self {
            position: Point::new(viewport.width / 2.0, viewport.height / 2.0),
            viewport,
        }
    }

    /// Wrap a new tracker in a shareable handle.
    pub fn shared(viewport: Size) -> SharedPointer {
        Rc::new(RefCell::new(Self::new(viewport)))
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Follow presses and moves. Other events and non-finite coordinates are ignored.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if let InputEvent::Press { position, .. } | InputEvent::PointerMove { position, .. } =
            *event
        {
            if finite_point(position) {
                self.position = position;
            }
        }
    }

    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            position: self.position,
            viewport: self.viewport,
        }
    }
}
