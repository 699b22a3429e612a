//! Rectangle selection gesture state machine
//!
//! Pure transitions only: no overlay drawing, no log access. The
//! controller in `session::selection` attaches those effects.

use super::geometry::{Point, Rectangle};

/// Gesture state for a rectangle drag
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Pointer is held down; `end` tracks the latest move
    Dragging { start: Point, end: Point },
}

/// What a transition asks the caller to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEffect {
    /// Nothing to draw or dispatch
    None,
    /// Redraw the preview outline
    Preview(Rectangle),
    /// Clear the preview and dispatch the finished rectangle
    Complete(Rectangle),
}

impl SelectionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, SelectionState::Dragging { .. })
    }

    /// Pointer pressed. Restarts the gesture if one is already in progress.
    pub fn pointer_down(self, at: Point) -> (Self, SelectionEffect) {
        (
            SelectionState::Dragging { start: at, end: at },
            SelectionEffect::None,
        )
    }

    /// Pointer moved. Ignored unless dragging.
    pub fn pointer_move(self, at: Point) -> (Self, SelectionEffect) {
        match self {
            SelectionState::Idle => (self, SelectionEffect::None),
            SelectionState::Dragging { start, .. } => (
                SelectionState::Dragging { start, end: at },
                SelectionEffect::Preview(Rectangle::from_points(start, at)),
            ),
        }
    }

    /// Pointer released. The up position, not the last move, closes the rectangle.
    pub fn pointer_up(self, at: Point) -> (Self, SelectionEffect) {
        match self {
            SelectionState::Idle => (self, SelectionEffect::None),
            SelectionState::Dragging { start, .. } => (
                SelectionState::Idle,
                SelectionEffect::Complete(Rectangle::from_points(start, at)),
            ),
        }
    }
}
