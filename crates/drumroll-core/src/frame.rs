//! Cooperative animation loop.
//!
//! Each frame callback advances the simulation by the time elapsed since the previous
//! frame and then requests exactly one more frame. Stopping the loop cancels the
//! pending request so no callback can run against a torn-down widget.

use std::collections::VecDeque;

use crate::config::REFERENCE_FPS;

/// Largest step a single frame may take. Longer gaps (a backgrounded tab) are
/// absorbed instead of replayed.
pub const MAX_FRAME_DELTA_SECONDS: f64 = 0.1;

/// Identifies one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Platform "call me before the next repaint" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Turns frame timestamps into simulation steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_delta_seconds: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            last_ms: None,
            max_delta_seconds: MAX_FRAME_DELTA_SECONDS,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to the maximum step.
    ///
    /// The first frame after a reset counts as one reference frame. Non-finite or
    /// backwards timestamps yield zero.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 1.0 / REFERENCE_FPS;
        };
        let dt = (now_ms - last) / 1000.0;
        if dt <= 0.0 {
            0.0
        } else {
            dt.min(self.max_delta_seconds)
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Self-rescheduling frame loop bound to one widget.
#[derive(Debug)]
pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    clock: FrameClock,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            clock: FrameClock::new(),
        }
    }

    /// Request the first frame if the loop is not already running.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    /// Cancel the pending frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.clock.reset();
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a fired frame. Returns the step to simulate, or `None` if the frame was
    /// not the one this loop is waiting for (cancelled or stale).
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> Option<f64> {
        if self.pending != Some(handle) {
            return None;
        }
        let dt = self.clock.advance(now_ms);
        self.pending = Some(self.scheduler.request_frame());
        Some(dt)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scheduler backed by an in-memory queue, for fixed-tick hosts and tests.
#[derive(Debug, Default)]
pub struct QueueScheduler {
    next_id: u64,
    queued: VecDeque<FrameHandle>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next requested frame, if any.
    pub fn pop(&mut self) -> Option<FrameHandle> {
        self.queued.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queued.len()
    }
}

impl FrameScheduler for QueueScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queued.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queued.retain(|queued| *queued != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_first_frame_is_reference_step() {
        let mut clock = FrameClock::new();
        assert!((clock.advance(1_000.0) - 1.0 / 60.0).abs() < f64::EPSILON);
        assert!((clock.advance(1_016.0) - 0.016).abs() < 1e-12);
    }

    #[test]
    fn test_clock_clamps_long_gaps() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert!((clock.advance(30_000.0) - MAX_FRAME_DELTA_SECONDS).abs() < f64::EPSILON);
        assert_eq!(clock.advance(29_000.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
    }

    #[test]
    fn test_loop_reschedules_one_frame_at_a_time() {
        let mut animation = AnimationLoop::new(QueueScheduler::new());
        animation.start();
        animation.start();
        assert_eq!(animation.scheduler().pending(), 1);

        let handle = animation.scheduler_mut().pop().unwrap();
        assert!(animation.on_frame(handle, 0.0).is_some());
        assert_eq!(animation.scheduler().pending(), 1);
        assert!(animation.is_running());
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut animation = AnimationLoop::new(QueueScheduler::new());
        animation.start();
        let handle = animation.scheduler_mut().pop().unwrap();
        animation.on_frame(handle, 0.0);

        animation.stop();
        assert!(!animation.is_running());
        assert_eq!(animation.scheduler().pending(), 0);

        // A frame that was already in flight is ignored.
        assert_eq!(animation.on_frame(FrameHandle(2), 16.0), None);
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut animation = AnimationLoop::new(QueueScheduler::new());
        animation.start();
        assert_eq!(animation.on_frame(FrameHandle(99), 0.0), None);
        assert!(animation.is_running());
    }
}
