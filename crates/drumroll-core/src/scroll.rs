//! Momentum scroll engine.
//!
//! Turns discrete input into a friction-damped scalar position over a fixed set of
//! items, settles onto the nearest item once the motion dies down, and reports each
//! change of the committed index exactly once.
//!
//! Wheel input uses the impulse model: it adds to velocity and the engine coasts.
//! Direct drags track the pointer 1:1 and hand their recent speed over as momentum on
//! release.

use kurbo::Vec2;
use std::fmt;

use crate::config::{Axis, BoundsMode, Presentation, REFERENCE_FPS, ScrollConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::input::ImpulseSource;
use crate::velocity::VelocitySampler;

/// How the host should place the item strip this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Translate the strip by this offset (pixels).
    Translate(Vec2),
    /// Rotate the drum about the scroll axis by this many degrees.
    Rotate(f64),
}

/// Snapshot handed to the presentation layer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub position: f64,
    pub index: usize,
    pub transform: Transform,
}

type IndexListener = Box<dyn FnMut(usize)>;

/// Scroll physics for one selector instance.
pub struct ScrollPhysics {
    config: ScrollConfig,
    item_count: usize,
    position: f64,
    /// Units per second.
    velocity: f64,
    is_dragging: bool,
    sampler: VelocitySampler,
    /// Explicit settle destination set by `scroll_to_index`.
    target: Option<f64>,
    /// Last index reported to the listener.
    committed_index: usize,
    listener: Option<IndexListener>,
    destroyed: bool,
}

impl fmt::Debug for ScrollPhysics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollPhysics")
            .field("item_count", &self.item_count)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("is_dragging", &self.is_dragging)
            .field("committed_index", &self.committed_index)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl ScrollPhysics {
    /// Create an engine resting on `initial_index`.
    pub fn new(item_count: usize, initial_index: usize, config: ScrollConfig) -> ConfigResult<Self> {
        config.validate()?;
        if item_count == 0 {
            return Err(ConfigError::NoItems);
        }
        if initial_index >= item_count {
            return Err(ConfigError::IndexOutOfRange {
                index: initial_index,
                count: item_count,
            });
        }

        Ok(Self {
            position: initial_index as f64 * config.item_extent,
            config,
            item_count,
            velocity: 0.0,
            is_dragging: false,
            sampler: VelocitySampler::new(),
            target: None,
            committed_index: initial_index,
            listener: None,
            destroyed: false,
        })
    }

    /// Install the callback invoked with the new index whenever the selection changes.
    pub fn on_index_change(&mut self, listener: impl FnMut(usize) + 'static) {
        if !self.destroyed {
            self.listener = Some(Box::new(listener));
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn item_extent(&self) -> f64 {
        self.config.item_extent
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True when nothing is moving and the position sits exactly on an item.
    pub fn is_idle(&self) -> bool {
        !self.is_dragging
            && self.velocity == 0.0
            && self.target.is_none()
            && self.offset_to(self.nearest_slot_position()) == 0.0
    }

    /// Index of the item nearest to the current position.
    pub fn current_index(&self) -> usize {
        let slot = self.nearest_slot();
        match self.config.bounds {
            BoundsMode::Circular => slot.rem_euclid(self.item_count as i64) as usize,
            BoundsMode::Clamped => slot.clamp(0, self.item_count as i64 - 1) as usize,
        }
    }

    /// Feed one input delta.
    ///
    /// Wheel deltas are scaled and added to velocity. Touch and drag deltas move the
    /// position directly and only apply between [`begin_drag`](Self::begin_drag) and
    /// [`end_drag`](Self::end_drag). Returns the new index if the selection changed.
    pub fn apply_impulse(
        &mut self,
        delta: f64,
        source: ImpulseSource,
        timestamp_ms: f64,
    ) -> Option<usize> {
        if self.destroyed {
            return None;
        }
        if !delta.is_finite() {
            log::trace!("Dropping non-finite {:?} delta", source);
            return None;
        }

        match source {
            ImpulseSource::Wheel => {
                if self.is_dragging {
                    return None;
                }
                self.target = None;
                let max = self.config.max_velocity;
                self.velocity =
                    (self.velocity + delta * self.config.wheel_sensitivity).clamp(-max, max);
            }
            ImpulseSource::Touch | ImpulseSource::Drag => {
                if !self.is_dragging {
                    log::trace!("Ignoring {:?} delta outside a drag", source);
                    return None;
                }
                self.position += delta;
                self.sampler.push(timestamp_ms, delta);
                self.constrain();
            }
        }

        self.commit()
    }

    /// The pointer took hold of the strip: stop coasting and track it directly.
    pub fn begin_drag(&mut self, timestamp_ms: f64) {
        if self.destroyed {
            return;
        }
        self.is_dragging = true;
        self.velocity = 0.0;
        self.target = None;
        self.sampler.reset(timestamp_ms);
    }

    /// The pointer let go: convert its recent speed into momentum.
    pub fn end_drag(&mut self, timestamp_ms: f64) {
        if self.destroyed || !self.is_dragging {
            return;
        }
        self.is_dragging = false;

        let max = self.config.max_velocity;
        let velocity = self.sampler.velocity(timestamp_ms).clamp(-max, max);
        self.velocity = if velocity.abs() > self.config.stop_threshold {
            velocity
        } else {
            0.0
        };
        self.sampler.clear();
    }

    /// Advance the simulation by `dt_seconds`. Returns the new index if it changed.
    pub fn tick(&mut self, dt_seconds: f64) -> Option<usize> {
        if self.destroyed || self.is_dragging {
            return None;
        }
        if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
            log::trace!("Skipping tick with dt {}", dt_seconds);
            return None;
        }

        if self.velocity.abs() > self.config.stop_threshold {
            self.position += self.velocity * dt_seconds;
            self.velocity *= self.config.friction.powf(dt_seconds * REFERENCE_FPS);
            if self.constrain() {
                self.velocity = 0.0;
            }
        } else {
            self.velocity = 0.0;
            self.settle_step(dt_seconds);
        }

        self.commit()
    }

    /// Jump to `index` without animation or notification.
    pub fn set_index(&mut self, index: usize) -> ConfigResult<()> {
        self.check_index(index)?;
        self.position = index as f64 * self.config.item_extent;
        self.velocity = 0.0;
        self.target = None;
        self.committed_index = index;
        Ok(())
    }

    /// Ease toward `index`. The listener fires as the committed index moves.
    pub fn scroll_to_index(&mut self, index: usize) -> ConfigResult<()> {
        self.check_index(index)?;
        if !self.is_dragging {
            self.velocity = 0.0;
            self.target = Some(index as f64 * self.config.item_extent);
        }
        Ok(())
    }

    pub fn render_state(&self) -> RenderState {
        let transform = match self.config.presentation {
            Presentation::Rotate => Transform::Rotate(self.position),
            Presentation::Translate => match self.config.axis {
                Axis::Vertical => Transform::Translate(Vec2::new(0.0, -self.position)),
                Axis::Horizontal => Transform::Translate(Vec2::new(-self.position, 0.0)),
            },
        };
        RenderState {
            position: self.position,
            index: self.current_index(),
            transform,
        }
    }

    /// Detach the listener and turn every further call into a no-op.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.listener = None;
        self.is_dragging = false;
        self.velocity = 0.0;
        self.target = None;
        self.sampler.clear();
    }

    fn check_index(&self, index: usize) -> ConfigResult<()> {
        if index < self.item_count {
            Ok(())
        } else {
            Err(ConfigError::IndexOutOfRange {
                index,
                count: self.item_count,
            })
        }
    }

    /// Nearest item slot, unwrapped. Exact halves go to the even slot.
    fn nearest_slot(&self) -> i64 {
        (self.position / self.config.item_extent).round_ties_even() as i64
    }

    fn nearest_slot_position(&self) -> f64 {
        self.nearest_slot() as f64 * self.config.item_extent
    }

    fn span(&self) -> f64 {
        self.item_count as f64 * self.config.item_extent
    }

    /// Signed distance from the position to `target`, the short way round on drums.
    fn offset_to(&self, target: f64) -> f64 {
        let diff = target - self.position;
        match self.config.bounds {
            BoundsMode::Clamped => diff,
            BoundsMode::Circular => {
                let span = self.span();
                let wrapped = diff.rem_euclid(span);
                if wrapped > span / 2.0 {
                    wrapped - span
                } else {
                    wrapped
                }
            }
        }
    }

    fn settle_step(&mut self, dt_seconds: f64) {
        let target = self
            .target
            .unwrap_or_else(|| self.nearest_slot_position());
        let diff = self.offset_to(target);

        if diff.abs() <= self.config.snap_epsilon {
            self.position = target;
            self.target = None;
        } else {
            let fraction = 1.0 - (1.0 - self.config.snap_factor).powf(dt_seconds * REFERENCE_FPS);
            self.position += diff * fraction;
        }
        self.constrain();
    }

    /// Bring the position back into range. Returns true on a clamped boundary hit.
    fn constrain(&mut self) -> bool {
        if !self.position.is_finite() {
            log::trace!("Recovering from non-finite position");
            self.position = self.committed_index as f64 * self.config.item_extent;
            self.velocity = 0.0;
            return false;
        }

        match self.config.bounds {
            BoundsMode::Circular => {
                self.position = self.position.rem_euclid(self.span());
                false
            }
            BoundsMode::Clamped => {
                let max = (self.item_count - 1) as f64 * self.config.item_extent;
                let clamped = self.position.clamp(0.0, max);
                let hit = clamped != self.position;
                self.position = clamped;
                hit
            }
        }
    }

    fn commit(&mut self) -> Option<usize> {
        let index = self.current_index();
        if index == self.committed_index {
            return None;
        }
        log::debug!("Selection moved {} -> {}", self.committed_index, index);
        self.committed_index = index;
        if let Some(listener) = self.listener.as_mut() {
            listener(index);
        }
        Some(index)
    }
}
