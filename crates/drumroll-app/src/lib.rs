//! Drumroll Application
//!
//! Host shell that owns the frame loop and feeds input into a selector widget.

mod app;
mod demo;

pub use app::{AppConfig, AppError, AppResult};
pub use demo::{Demo, DemoReport, ScriptStep};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebOrbit, WebWheel};
