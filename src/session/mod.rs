//! Redaction session management module
//!
//! This module contains:
//! - The event log (undo/redo by replay)
//! - The selection controller turning pointer gestures into actions
//! - Session messages and the session that wires everything to a canvas

pub mod event_log;
pub mod messages;
pub mod selection;
pub mod state;

pub use event_log::{EventLog, PristineImage, ResetHook};
pub use messages::{SessionMsg, parse_script};
pub use selection::{OutlineStyle, SelectionController};
pub use state::RedactionSession;
