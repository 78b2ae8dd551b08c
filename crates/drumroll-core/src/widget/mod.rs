//! Selector widgets.
//!
//! Widgets are thin adapters around the engines:
//! - [`WheelSelector`] drives a [`ScrollPhysics`](crate::scroll::ScrollPhysics) for
//!   sliders, drums and 3D drums
//! - [`OrbitSelector`] drives a [`GestureClassifier`](crate::gesture::GestureClassifier)
//!   and an [`Orientation`](crate::orientation::Orientation) for 3D rotating objects
//!
//! Each widget routes events through a [`HandlerTable`] and exposes its render state.
//! The host owns the frame loop and the presentation layer.

mod dispatch;
mod orbit;
mod state;
mod wheel;

pub use dispatch::{Handler, HandlerTable};
pub use orbit::{OrbitRenderState, OrbitSelector};
pub use state::WidgetState;
pub use wheel::WheelSelector;

use uuid::Uuid;

use crate::input::InputEvent;

/// Unique identifier for a widget instance.
pub type WidgetId = Uuid;

/// Common lifecycle of every selector widget.
pub trait Widget {
    fn id(&self) -> WidgetId;

    /// Route one input event. Returns true if the widget handled it.
    fn handle_event(&mut self, event: &InputEvent) -> bool;

    /// Advance animations by `dt_seconds`.
    fn tick(&mut self, dt_seconds: f64);

    fn state(&self) -> WidgetState;

    /// Drop all listeners and ignore every later call.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool {
        self.state() == WidgetState::Destroyed
    }
}
