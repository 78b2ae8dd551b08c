//! Widget state definitions.

use crate::gesture::GestureKind;

/// What a widget is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// At rest on a committed value.
    #[default]
    Idle,
    /// A pointer or gesture owns the widget.
    Interacting(GestureKind),
    /// Coasting or settling after input ended.
    Animating,
    /// Torn down; every call is a no-op.
    Destroyed,
}

impl WidgetState {
    /// Check if the host should keep the frame loop running.
    pub fn needs_frames(&self) -> bool {
        matches!(self, Self::Interacting(_) | Self::Animating)
    }

    /// Check if a pointer or gesture is active.
    pub fn is_interacting(&self) -> bool {
        matches!(self, Self::Interacting(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_frames() {
        assert!(!WidgetState::Idle.needs_frames());
        assert!(WidgetState::Animating.needs_frames());
        assert!(WidgetState::Interacting(GestureKind::Twist).needs_frames());
        assert!(!WidgetState::Destroyed.needs_frames());
        assert!(WidgetState::Interacting(GestureKind::Drag).is_interacting());
    }
}
