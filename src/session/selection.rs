//! Pointer gestures → redaction actions

use image::Rgba;

use super::event_log::EventLog;
use crate::buffer::PixelBuffer;
use crate::domain::{Action, Point, RedactionKind, Rectangle, SelectionEffect, SelectionState};
use crate::error::Result;
use crate::render::Overlay;

/// How the in-progress selection is outlined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineStyle {
    pub color: Rgba<u8>,
    pub width: f32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color: Rgba([0, 0, 255, 255]),
            width: 2.0,
        }
    }
}

/// Drives `SelectionState` from pointer input, drawing the preview on an
/// overlay and appending finished selections to an event log
pub struct SelectionController<O> {
    state: SelectionState,
    mode: RedactionKind,
    origin: Point,
    overlay: O,
    outline: OutlineStyle,
}

impl<O: Overlay> SelectionController<O> {
    pub fn new(overlay: O, mode: RedactionKind) -> Self {
        Self {
            state: SelectionState::Idle,
            mode,
            origin: Point::default(),
            overlay,
            outline: OutlineStyle::default(),
        }
    }

    pub fn with_outline(mut self, outline: OutlineStyle) -> Self {
        self.outline = outline;
        self
    }

    /// Redaction kind the next completed selection produces
    pub fn mode(&self) -> RedactionKind {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RedactionKind) {
        self.mode = mode;
    }

    /// Top-left of the buffer in the coordinate space pointer events arrive in
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Start a gesture. A press while already dragging restarts it.
    pub fn pointer_down(&mut self, at: Point) {
        if matches!(self.state, SelectionState::Dragging { .. }) {
            self.overlay.clear();
        }
        self.transition(|state, local| state.pointer_down(local), at);
    }

    pub fn pointer_move(&mut self, at: Point) {
        if let SelectionEffect::Preview(rect) =
            self.transition(|state, local| state.pointer_move(local), at)
        {
            self.overlay.clear();
            self.overlay
                .stroke_rect(&rect, self.outline.color, self.outline.width);
        }
    }

    /// Finish the gesture. Returns the appended action, or `None` if no drag
    /// was in progress.
    pub fn pointer_up<B: PixelBuffer>(
        &mut self,
        at: Point,
        log: &mut EventLog<B>,
    ) -> Result<Option<Action>> {
        let SelectionEffect::Complete(rect) =
            self.transition(|state, local| state.pointer_up(local), at)
        else {
            return Ok(None);
        };
        self.overlay.clear();
        if rect.is_empty() {
            log::debug!("zero-area selection at ({}, {})", rect.x0(), rect.y0());
        }
        let action = Action::new(self.mode, rect);
        log.append(action)?;
        Ok(Some(action))
    }

    /// The rectangle being dragged, if any
    pub fn preview(&self) -> Option<Rectangle> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Dragging { start, end } => Some(Rectangle::from_points(start, end)),
        }
    }

    fn transition(
        &mut self,
        step: impl FnOnce(SelectionState, Point) -> (SelectionState, SelectionEffect),
        at: Point,
    ) -> SelectionEffect {
        let (state, effect) = step(self.state, at.relative_to(self.origin));
        self.state = state;
        effect
    }
}
