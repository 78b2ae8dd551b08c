//! Release velocity estimation for direct drags.
//!
//! Keeps a short window of time-stamped deltas. Velocity is the total movement in the
//! window divided by the time it spans, so each sample weighs in proportion to the
//! time it covers.

use std::collections::VecDeque;

/// Maximum number of samples kept in the window.
const MAX_SAMPLES: usize = 6;

/// Only samples within the last 100ms contribute.
pub const HORIZON_MS: f64 = 100.0;

/// If the newest sample is older than this at release, the pointer had stopped.
pub const ASSUME_STOPPED_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy)]
struct Sample {
    time_ms: f64,
    delta: f64,
}

/// Rolling-window velocity estimator for one scroll axis.
#[derive(Debug, Clone, Default)]
pub struct VelocitySampler {
    samples: VecDeque<Sample>,
    /// Sign of the last non-zero delta, 0.0 before any movement.
    direction: f64,
}

impl VelocitySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new window anchored at the press time.
    pub fn reset(&mut self, time_ms: f64) {
        self.samples.clear();
        self.direction = 0.0;
        self.samples.push_back(Sample {
            time_ms,
            delta: 0.0,
        });
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.direction = 0.0;
    }

    /// Record a movement of `delta` units observed at `time_ms`.
    ///
    /// A delta pointing against the previous movement starts a fresh window, so momentum
    /// from before a reversal is never released.
    pub fn push(&mut self, time_ms: f64, delta: f64) {
        if !time_ms.is_finite() || !delta.is_finite() {
            return;
        }

        if let Some(last) = self.samples.back().copied() {
            if time_ms < last.time_ms {
                // Out-of-order timestamp; keep the movement but pin it to the last time.
                return self.push(last.time_ms, delta);
            }
            // Zero deltas (motion along the other axis) carry no direction.
            if self.direction != 0.0 && delta != 0.0 && delta.signum() != self.direction {
                self.samples.clear();
                self.samples.push_back(Sample {
                    time_ms: last.time_ms,
                    delta: 0.0,
                });
            }
        }

        if delta != 0.0 {
            self.direction = delta.signum();
        }
        self.samples.push_back(Sample { time_ms, delta });

        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
        while let Some(front) = self.samples.front() {
            if time_ms - front.time_ms > HORIZON_MS && self.samples.len() > 1 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity in units per second as seen at `now_ms`.
    ///
    /// Returns 0.0 when fewer than two samples exist, when the window spans no time,
    /// or when the pointer has been still for [`ASSUME_STOPPED_MS`].
    pub fn velocity(&self, now_ms: f64) -> f64 {
        let (Some(oldest), Some(newest)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        if self.samples.len() < 2 || now_ms - newest.time_ms > ASSUME_STOPPED_MS {
            return 0.0;
        }

        let span = newest.time_ms - oldest.time_ms;
        if span <= 0.0 {
            return 0.0;
        }

        // The oldest sample only anchors the time span.
        let distance: f64 = self.samples.iter().skip(1).map(|s| s.delta).sum();
        let velocity = distance / span * 1000.0;
        if velocity.is_finite() { velocity } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        let sampler = VelocitySampler::new();
        assert_eq!(sampler.velocity(0.0), 0.0);
    }

    #[test]
    fn test_steady_motion() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        for i in 1..=4 {
            sampler.push(i as f64 * 10.0, 5.0);
        }
        // 20 units over 40ms
        assert!((sampler.velocity(40.0) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_stale_release_is_zero() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        sampler.push(10.0, 15.0);
        sampler.push(20.0, 15.0);
        assert!(sampler.velocity(20.0) > 0.0);
        assert_eq!(sampler.velocity(20.0 + ASSUME_STOPPED_MS + 1.0), 0.0);
    }

    #[test]
    fn test_reversal_discards_old_direction() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        sampler.push(10.0, 30.0);
        sampler.push(20.0, 30.0);
        sampler.push(30.0, -5.0);
        // Only the reversed movement counts: -5 over 10ms
        assert!((sampler.velocity(30.0) + 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_reversal_detected_across_still_sample() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        sampler.push(10.0, 30.0);
        sampler.push(20.0, 0.0);
        sampler.push(30.0, -5.0);
        // -5 over the 10ms since the still sample
        assert!((sampler.velocity(30.0) + 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_forgets_direction() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        sampler.push(10.0, 30.0);
        sampler.reset(100.0);
        sampler.push(110.0, -10.0);
        sampler.push(120.0, -10.0);
        assert!((sampler.velocity(120.0) + 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizon_drops_old_samples() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        sampler.push(10.0, 100.0);
        sampler.push(200.0, 1.0);
        sampler.push(210.0, 1.0);
        // The early burst is outside the horizon
        let v = sampler.velocity(210.0);
        assert!(v.abs() < 200.0, "velocity {v} still includes the early burst");
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut sampler = VelocitySampler::new();
        sampler.reset(0.0);
        sampler.push(10.0, f64::NAN);
        sampler.push(f64::INFINITY, 1.0);
        assert_eq!(sampler.velocity(10.0), 0.0);
    }
}
