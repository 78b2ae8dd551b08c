//! Wheel, drum and 3D drum selectors.

use kurbo::{Point, Vec2};
use std::rc::Rc;

use super::{HandlerTable, Widget, WidgetId, WidgetState};
use crate::config::{Axis, ScrollConfig};
use crate::error::ConfigResult;
use crate::gesture::GestureKind;
use crate::input::{EventKind, ImpulseSource, InputEvent, finite_point};
use crate::options::{OptionList, SelectOption};
use crate::scroll::{RenderState, ScrollPhysics};

/// A selector that scrolls through a list of options along one axis.
///
/// Linear sliders, drums and 3D drums differ only in their [`ScrollConfig`].
#[derive(Debug)]
pub struct WheelSelector<V> {
    id: WidgetId,
    options: Rc<OptionList<V>>,
    physics: ScrollPhysics,
    handlers: Rc<HandlerTable<Self>>,
    /// Last pointer position while pressed.
    anchor: Option<Point>,
    touch_count: usize,
}

impl<V: PartialEq + 'static> WheelSelector<V> {
    /// Create a selector resting on `initial`. An unknown value falls back to the first option.
    pub fn new(options: OptionList<V>, initial: &V, config: ScrollConfig) -> ConfigResult<Self> {
        let initial_index = options.position_of(initial).unwrap_or_else(|| {
            log::warn!("Initial value not among the options, starting at the first one");
            0
        });
        let physics = ScrollPhysics::new(options.len(), initial_index, config)?;

        let handlers = HandlerTable::new()
            .with(EventKind::Motion, Self::on_motion)
            .with(EventKind::Press, Self::on_press)
            .with(EventKind::PointerMove, Self::on_pointer_move)
            .with(EventKind::TouchCount, Self::on_touch_count);

        Ok(Self {
            id: WidgetId::new_v4(),
            options: Rc::new(options),
            physics,
            handlers: Rc::new(handlers),
            anchor: None,
            touch_count: 0,
        })
    }

    /// Install the callback invoked with the newly selected value and its index.
    pub fn on_value_change(&mut self, mut listener: impl FnMut(&V, usize) + 'static) {
        let options = Rc::clone(&self.options);
        self.physics.on_index_change(move |index| {
            if let Some(option) = options.get(index) {
                listener(&option.value, index);
            }
        });
    }

    pub fn options(&self) -> &OptionList<V> {
        &self.options
    }

    pub fn physics(&self) -> &ScrollPhysics {
        &self.physics
    }

    pub fn selected_index(&self) -> usize {
        self.physics.current_index()
    }

    pub fn selected(&self) -> Option<&SelectOption<V>> {
        self.options.get(self.selected_index())
    }

    /// Jump to `value` silently. Returns false if it is not among the options.
    pub fn set_value(&mut self, value: &V) -> bool {
        match self.options.position_of(value) {
            Some(index) => self.physics.set_index(index).is_ok(),
            None => false,
        }
    }

    /// Animate to `value`, notifying as the selection moves.
    pub fn scroll_to_value(&mut self, value: &V) -> bool {
        match self.options.position_of(value) {
            Some(index) => self.physics.scroll_to_index(index).is_ok(),
            None => false,
        }
    }

    pub fn render_state(&self) -> RenderState {
        self.physics.render_state()
    }

    fn axis_component(&self, v: Vec2) -> f64 {
        match self.physics.config().axis {
            Axis::Vertical => v.y,
            Axis::Horizontal => v.x,
        }
    }

    fn on_motion(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Motion {
            delta,
            timestamp_ms,
        } = *event
        else {
            return false;
        };
        let delta = self.axis_component(delta);
        self.physics
            .apply_impulse(delta, ImpulseSource::Wheel, timestamp_ms);
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
        if pressed {
            if !finite_point(position) {
                return false;
            }
            self.anchor = Some(position);
            self.physics.begin_drag(timestamp_ms);
        } else {
            self.anchor = None;
            self.physics.end_drag(timestamp_ms);
        }
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
        let Some(anchor) = self.anchor else {
            return false;
        };
        if !finite_point(position) {
            return false;
        }
        self.anchor = Some(position);

        // Dragging toward the start of the axis brings later items into view.
        let moved = self.axis_component(position - anchor);
        let delta = -moved * self.physics.config().drag_factor;
        let source = if self.touch_count > 0 {
            ImpulseSource::Touch
        } else {
            ImpulseSource::Drag
        };
        self.physics.apply_impulse(delta, source, timestamp_ms);
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
        self.touch_count = count;
        if count == 0 && self.anchor.take().is_some() {
            self.physics.end_drag(timestamp_ms);
        }
        true
    }
}

impl<V: PartialEq + 'static> Widget for WheelSelector<V> {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn handle_event(&mut self, event: &InputEvent) -> bool {
        if self.physics.is_destroyed() {
            return false;
        }
        let handlers = Rc::clone(&self.handlers);
        handlers.dispatch(self, event)
    }

    fn tick(&mut self, dt_seconds: f64) {
        self.physics.tick(dt_seconds);
    }

    fn state(&self) -> WidgetState {
        if self.physics.is_destroyed() {
            WidgetState::Destroyed
        } else if self.physics.is_dragging() {
            WidgetState::Interacting(GestureKind::Drag)
        } else if self.physics.is_idle() {
            WidgetState::Idle
        } else {
            WidgetState::Animating
        }
    }

    fn destroy(&mut self) {
        self.anchor = None;
        self.physics.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Presentation;
    use crate::scroll::Transform;
    use std::cell::RefCell;

    const DT: f64 = 1.0 / 60.0;

    fn digits() -> OptionList<u32> {
        OptionList::new((0..10).map(|n| SelectOption::new(n, n.to_string())).collect()).unwrap()
    }

    fn settle<V: PartialEq + 'static>(widget: &mut WheelSelector<V>) {
        for _ in 0..2_000 {
            if widget.state() == WidgetState::Idle {
                return;
            }
            widget.tick(DT);
        }
        panic!("selector did not settle");
    }

    fn press(pressed: bool, y: f64, t: f64) -> InputEvent {
        InputEvent::Press {
            pressed,
            position: Point::new(50.0, y),
            timestamp_ms: t,
        }
    }

    fn move_to(y: f64, t: f64) -> InputEvent {
        InputEvent::PointerMove {
            position: Point::new(50.0, y),
            timestamp_ms: t,
        }
    }

    #[test]
    fn test_unknown_initial_value_falls_back() {
        let widget = WheelSelector::new(digits(), &42, ScrollConfig::linear(30.0)).unwrap();
        assert_eq!(widget.selected_index(), 0);

        let widget = WheelSelector::new(digits(), &7, ScrollConfig::linear(30.0)).unwrap();
        assert_eq!(widget.selected().map(|o| o.value), Some(7));
    }

    #[test]
    fn test_drag_up_selects_next_values() {
        let mut widget = WheelSelector::new(digits(), &3, ScrollConfig::linear(30.0)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        widget.on_value_change(move |value, index| sink.borrow_mut().push((*value, index)));

        assert!(widget.handle_event(&press(true, 200.0, 0.0)));
        assert!(widget.state().is_interacting());
        widget.handle_event(&move_to(180.0, 16.0));
        widget.handle_event(&move_to(155.0, 32.0));
        assert!((widget.physics().position() - 135.0).abs() < 1e-9);
        widget.handle_event(&press(false, 155.0, 500.0));

        settle(&mut widget);
        assert_eq!(widget.selected_index(), 4);
        assert_eq!(seen.borrow().as_slice(), &[(4, 4)]);
    }

    #[test]
    fn test_wheel_moves_along_axis() {
        let mut config = ScrollConfig::linear(30.0);
        config.axis = Axis::Horizontal;
        let mut widget = WheelSelector::new(digits(), &0, config).unwrap();

        widget.handle_event(&InputEvent::Motion {
            delta: Vec2::new(0.0, 400.0),
            timestamp_ms: 0.0,
        });
        assert_eq!(widget.physics().velocity(), 0.0);

        widget.handle_event(&InputEvent::Motion {
            delta: Vec2::new(400.0, 0.0),
            timestamp_ms: 0.0,
        });
        assert!(widget.physics().velocity() > 0.0);
        settle(&mut widget);
        assert!(widget.selected_index() > 0);
    }

    #[test]
    fn test_move_without_press_ignored() {
        let mut widget = WheelSelector::new(digits(), &3, ScrollConfig::linear(30.0)).unwrap();
        assert!(!widget.handle_event(&move_to(10.0, 0.0)));
        assert_eq!(widget.selected_index(), 3);
    }

    #[test]
    fn test_touch_release_ends_drag() {
        let mut widget = WheelSelector::new(digits(), &3, ScrollConfig::drum(30.0)).unwrap();
        widget.handle_event(&InputEvent::TouchCount {
            count: 1,
            timestamp_ms: 0.0,
        });
        widget.handle_event(&press(true, 100.0, 0.0));
        widget.handle_event(&move_to(130.0, 16.0));
        widget.handle_event(&InputEvent::TouchCount {
            count: 0,
            timestamp_ms: 600.0,
        });
        assert!(!widget.physics().is_dragging());
        settle(&mut widget);
        assert_eq!(widget.selected_index(), 2);
    }

    #[test]
    fn test_two_point_events_unhandled() {
        let mut widget = WheelSelector::new(digits(), &3, ScrollConfig::linear(30.0)).unwrap();
        assert!(!widget.handle_event(&InputEvent::TwoPoint {
            p1: Point::new(0.0, 0.0),
            p2: Point::new(10.0, 0.0),
            timestamp_ms: 0.0,
        }));
    }

    #[test]
    fn test_drum_3d_rotates() {
        let letters = OptionList::from_labels(["a", "b", "c", "d", "e", "f"]).unwrap();
        let config = ScrollConfig::drum_3d(letters.len());
        assert_eq!(config.presentation, Presentation::Rotate);

        let mut widget = WheelSelector::new(letters, &"c".to_string(), config).unwrap();
        assert_eq!(widget.render_state().transform, Transform::Rotate(120.0));

        assert!(widget.scroll_to_value(&"a".to_string()));
        settle(&mut widget);
        assert_eq!(widget.selected().map(|o| o.label.as_str()), Some("a"));
        assert!(!widget.set_value(&"z".to_string()));
    }

    #[test]
    fn test_destroy_silences_widget() {
        let mut widget = WheelSelector::new(digits(), &3, ScrollConfig::linear(30.0)).unwrap();
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        widget.on_value_change(move |_, _| *sink.borrow_mut() += 1);

        widget.destroy();
        assert!(widget.is_destroyed());
        assert!(!widget.handle_event(&InputEvent::Motion {
            delta: Vec2::new(0.0, 500.0),
            timestamp_ms: 0.0,
        }));
        widget.tick(DT);
        assert_eq!(*seen.borrow(), 0);
    }
}
