//! Rectangle redaction with replay-based undo
//!
//! Pointer gestures become rectangles (`session::SelectionController`),
//! rectangles become actions in an `session::EventLog`, and actions are
//! applied to a `buffer::PixelBuffer` by the `redaction` library.

pub mod buffer;
pub mod config;
pub mod domain;
pub mod error;
pub mod redaction;
pub mod render;
pub mod session;

pub use error::{RedactError, Result};
