//! Event-kind to handler dispatch.

use std::collections::HashMap;
use std::fmt;

use crate::input::{EventKind, InputEvent};

/// A widget method that handles one kind of event. Returns true if consumed.
pub type Handler<W> = fn(&mut W, &InputEvent) -> bool;

/// Maps each event kind a widget understands to the method that handles it.
pub struct HandlerTable<W> {
    handlers: HashMap<EventKind, Handler<W>>,
}

impl<W> HandlerTable<W> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Builder-style registration.
    pub fn with(mut self, kind: EventKind, handler: Handler<W>) -> Self {
        self.register(kind, handler);
        self
    }

    /// Register `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: EventKind, handler: Handler<W>) {
        self.handlers.insert(kind, handler);
    }

    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn get(&self, kind: EventKind) -> Option<Handler<W>> {
        self.handlers.get(&kind).copied()
    }

    /// Call the handler registered for the event's kind. Unhandled kinds return false.
    pub fn dispatch(&self, widget: &mut W, event: &InputEvent) -> bool {
        match self.get(event.kind()) {
            Some(handler) => handler(widget, event),
            None => false,
        }
    }
}

impl<W> Default for HandlerTable<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Clone for HandlerTable<W> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<W> fmt::Debug for HandlerTable<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[derive(Default)]
    struct Counter {
        motions: usize,
    }

    fn count_motion(counter: &mut Counter, _event: &InputEvent) -> bool {
        counter.motions += 1;
        true
    }

    #[test]
    fn test_dispatch_by_kind() {
        let table = HandlerTable::new().with(EventKind::Motion, count_motion);
        let mut counter = Counter::default();

        let motion = InputEvent::Motion {
            delta: Vec2::new(0.0, 3.0),
            timestamp_ms: 0.0,
        };
        let count = InputEvent::TouchCount {
            count: 1,
            timestamp_ms: 0.0,
        };

        assert!(table.dispatch(&mut counter, &motion));
        assert!(!table.dispatch(&mut counter, &count));
        assert_eq!(counter.motions, 1);
        assert!(table.handles(EventKind::Motion));
        assert!(!table.handles(EventKind::TwoPoint));
    }
}
