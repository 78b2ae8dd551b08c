//! Fixed-tick host that replays scripted input into a wheel selector.

use std::cell::RefCell;
use std::rc::Rc;

use drumroll_core::{AnimationLoop, Axis, InputEvent, QueueScheduler, WheelSelector, Widget};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::app::{AppConfig, AppResult};

/// Longest the host waits for the selector to come to rest.
const SETTLE_TIMEOUT_MS: f64 = 10_000.0;

/// Where scripted drags start, in viewport coordinates.
const DRAG_ORIGIN: Point = Point::new(160.0, 240.0);

/// One scripted input action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    /// A single wheel notch of `delta` pixels along the scroll axis.
    Wheel { delta: f64 },
    /// Press, move `distance` pixels along the scroll axis over `duration_ms`, release.
    Drag { distance: f64, duration_ms: f64 },
    /// Let frames run without input.
    Wait { duration_ms: f64 },
    /// Run frames until the selector stops moving.
    Settle,
}

impl ScriptStep {
    pub fn default_script() -> Vec<Self> {
        vec![
            Self::Wheel { delta: 120.0 },
            Self::Settle,
            Self::Drag {
                distance: -75.0,
                duration_ms: 120.0,
            },
            Self::Settle,
            Self::Wheel { delta: -240.0 },
            Self::Settle,
        ]
    }
}

/// Outcome of a scripted run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    /// Every value change, in order, as (label, index).
    pub changes: Vec<(String, usize)>,
    pub selected_index: usize,
    pub selected_label: String,
    pub frames: u64,
    pub elapsed_ms: f64,
}

/// A selector driven by a fixed-rate frame loop.
pub struct Demo {
    selector: WheelSelector<String>,
    animation: AnimationLoop<QueueScheduler>,
    changes: Rc<RefCell<Vec<(String, usize)>>>,
    frame_ms: f64,
    now_ms: f64,
    frames: u64,
}

impl Demo {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        let options = config.options()?;
        let mut selector = WheelSelector::new(
            options,
            &config.initial_label().to_string(),
            config.scroll.clone(),
        )?;

        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let id = selector.id();
        selector.on_value_change(move |label: &String, index| {
            log::info!("[{}] selected {} (index {})", id, label, index);
            sink.borrow_mut().push((label.clone(), index));
        });

        Ok(Self {
            selector,
            animation: AnimationLoop::new(QueueScheduler::new()),
            changes,
            frame_ms: config.frame_interval_ms(),
            now_ms: 0.0,
            frames: 0,
        })
    }

    pub fn selector(&self) -> &WheelSelector<String> {
        &self.selector
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Replay `script` and report where the selector ended up.
    pub fn run(&mut self, script: &[ScriptStep]) -> DemoReport {
        for step in script {
            log::debug!("Script step {:?} at {:.0}ms", step, self.now_ms);
            match *step {
                ScriptStep::Wheel { delta } => self.wheel(delta),
                ScriptStep::Drag {
                    distance,
                    duration_ms,
                } => self.drag(distance, duration_ms),
                ScriptStep::Wait { duration_ms } => self.wait(duration_ms),
                ScriptStep::Settle => self.settle(),
            }
        }
        self.report()
    }

    pub fn report(&self) -> DemoReport {
        let selected_index = self.selector.selected_index();
        let selected_label = self
            .selector
            .selected()
            .map(|option| option.label.clone())
            .unwrap_or_default();
        DemoReport {
            changes: self.changes.borrow().clone(),
            selected_index,
            selected_label,
            frames: self.frames,
            elapsed_ms: self.now_ms,
        }
    }

    /// Tear down the selector and stop the frame loop.
    pub fn shutdown(&mut self) {
        self.selector.destroy();
        self.animation.stop();
    }

    fn along_axis(&self, amount: f64) -> Vec2 {
        match self.selector.physics().config().axis {
            Axis::Vertical => Vec2::new(0.0, amount),
            Axis::Horizontal => Vec2::new(amount, 0.0),
        }
    }

    fn send(&mut self, event: InputEvent) {
        if self.selector.handle_event(&event) {
            self.animation.start();
        }
    }

    fn wheel(&mut self, delta: f64) {
        let delta = self.along_axis(delta);
        self.send(InputEvent::Motion {
            delta,
            timestamp_ms: self.now_ms,
        });
    }

    fn drag(&mut self, distance: f64, duration_ms: f64) {
        let steps = (duration_ms / self.frame_ms).round().max(1.0) as usize;
        let step = self.along_axis(distance / steps as f64);
        let mut position = DRAG_ORIGIN;

        self.send(InputEvent::Press {
            pressed: true,
            position,
            timestamp_ms: self.now_ms,
        });
        for _ in 0..steps {
            self.advance();
            position += step;
            self.send(InputEvent::PointerMove {
                position,
                timestamp_ms: self.now_ms,
            });
        }
        self.send(InputEvent::Press {
            pressed: false,
            position,
            timestamp_ms: self.now_ms,
        });
    }

    fn wait(&mut self, duration_ms: f64) {
        let end = self.now_ms + duration_ms;
        while self.now_ms < end {
            self.advance();
        }
    }

    fn settle(&mut self) {
        let deadline = self.now_ms + SETTLE_TIMEOUT_MS;
        while self.selector.state().needs_frames() {
            if self.now_ms >= deadline {
                log::warn!("Selector still moving after {}ms", SETTLE_TIMEOUT_MS);
                return;
            }
            self.animation.start();
            self.advance();
        }
    }

    /// Move the clock forward one tick and fire the pending frame, if any.
    fn advance(&mut self) {
        self.now_ms += self.frame_ms;
        let Some(handle) = self.animation.scheduler_mut().pop() else {
            return;
        };
        if let Some(dt) = self.animation.on_frame(handle, self.now_ms) {
            self.selector.tick(dt);
            self.frames += 1;
        }
        if !self.selector.state().needs_frames() {
            self.animation.stop();
        }
    }
}
