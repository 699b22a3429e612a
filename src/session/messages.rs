//! Messages a redaction session accepts
//!
//! These are what an embedding UI (or a script for the headless driver)
//! feeds into `RedactionSession::handle`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Point, RedactionKind};

/// One input to a redaction session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SessionMsg {
    /// Pointer pressed at a position
    Down { x: f32, y: f32 },
    /// Pointer moved
    Move { x: f32, y: f32 },
    /// Pointer released
    Up { x: f32, y: f32 },
    /// Switch the redaction kind for following selections
    Mode { mode: RedactionKind },
    /// Undo last redaction
    Undo,
    /// Redo undone redaction
    Redo,
    /// Wait for pending redactions to land
    Settle,
}

impl SessionMsg {
    /// Full press-drag-release gesture from `from` to `to`
    pub fn drag(from: Point, to: Point) -> [SessionMsg; 3] {
        [
            SessionMsg::Down {
                x: from.x,
                y: from.y,
            },
            SessionMsg::Move { x: to.x, y: to.y },
            SessionMsg::Up { x: to.x, y: to.y },
        ]
    }
}

/// Parse a JSON array of messages
pub fn parse_script(json: &str) -> Result<Vec<SessionMsg>> {
    serde_json::from_str(json).context("Invalid session script")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            r#"[
                {"op": "mode", "mode": "blur"},
                {"op": "down", "x": 10, "y": 12.5},
                {"op": "up", "x": 60, "y": 60},
                {"op": "undo"},
                {"op": "redo"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![
                SessionMsg::Mode {
                    mode: RedactionKind::Blur
                },
                SessionMsg::Down { x: 10.0, y: 12.5 },
                SessionMsg::Up { x: 60.0, y: 60.0 },
                SessionMsg::Undo,
                SessionMsg::Redo,
            ]
        );
    }

    #[test]
    fn test_unknown_mode_in_script_fails() {
        let err = parse_script(r#"[{"op": "mode", "mode": "pixelate"}]"#).unwrap_err();
        assert!(err.to_string().contains("Invalid session script"));
    }
}
