//! Error type for the redaction core

use crate::domain::RedactionKind;

/// Failures raised by the buffer, the redaction library and the event log
#[derive(Debug, thiserror::Error)]
pub enum RedactError {
    /// `undo()` needs a pristine image to replay from, and none was bound
    #[error("reset hook not configured: bind a pristine image before undo")]
    ResetNotConfigured,

    /// The buffer has no pixels to operate on
    #[error("pixel buffer is empty ({width}x{height})")]
    EmptyBuffer { width: u32, height: u32 },

    /// The log was used outside a Tokio runtime
    #[error("no async runtime available to run redaction jobs")]
    NoRuntime,

    /// Mode value outside `black-out` / `blur`
    #[error("unknown redaction mode: {0:?}")]
    UnknownMode(String),

    /// The library has no operation for this kind
    #[error("no operation registered for {0}")]
    UnregisteredKind(RedactionKind),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image data does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32 },

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A job panicked while holding the buffer lock
    #[error("pixel buffer lock poisoned")]
    PoisonedBuffer,
}

pub type Result<T, E = RedactError> = std::result::Result<T, E>;
