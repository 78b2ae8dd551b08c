//! Drumroll Core Library
//!
//! Platform-agnostic momentum scrolling and gesture classification for wheel, drum and
//! 3D selector widgets.

pub mod config;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod input;
pub mod options;
pub mod orientation;
pub mod scroll;
pub mod velocity;
pub mod widget;

pub use config::{Axis, BoundsMode, GestureConfig, OrbitConfig, Presentation, ScrollConfig};
pub use error::{ConfigError, ConfigResult};
pub use frame::{AnimationLoop, FrameClock, FrameHandle, FrameScheduler, QueueScheduler};
pub use gesture::{GestureClassifier, GestureKind, GestureUpdate, PairMetrics};
pub use input::{EventKind, ImpulseSource, InputEvent, PointerSnapshot, PointerTracker, SharedPointer};
pub use options::{OptionList, SelectOption};
pub use orientation::Orientation;
pub use scroll::{RenderState, ScrollPhysics, Transform};
pub use velocity::VelocitySampler;
pub use widget::{HandlerTable, OrbitRenderState, OrbitSelector, WheelSelector, Widget, WidgetId, WidgetState};
