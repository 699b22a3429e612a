//! The two redaction operations
//!
//! Each returns a lazy job: nothing touches the buffer until the job is
//! polled, so a queued job always sees the state its predecessors left.

use futures::FutureExt;

use super::{Job, RedactionStyle};
use crate::buffer::{self, Filter, PixelBuffer, SharedBuffer};
use crate::domain::Rectangle;
use crate::error::{RedactError, Result};

fn ensure_pixels<B: PixelBuffer>(buffer: &B) -> Result<()> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(RedactError::EmptyBuffer {
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    Ok(())
}

/// Fill `rect` with the style's opaque fill colour. Idempotent.
pub fn black_out<B: PixelBuffer>(
    rect: Rectangle,
    shared: SharedBuffer<B>,
    style: RedactionStyle,
) -> Job {
    async move {
        let mut buffer = buffer::lock(&shared)?;
        ensure_pixels(&*buffer)?;
        buffer.set_fill_color(style.fill);
        buffer.fill_rect(&rect);
        log::debug!("black-out applied at {rect:?}");
        Ok::<_, RedactError>(())
    }
    .boxed()
}

/// Smooth the content of `rect`.
///
/// Snapshots the whole raster, decodes the snapshot on the blocking pool,
/// then redraws `rect` from it through the blur filter. Repeated blurs
/// compound.
pub fn blur<B: PixelBuffer>(rect: Rectangle, shared: SharedBuffer<B>, style: RedactionStyle) -> Job {
    async move {
        let snapshot = {
            let buffer = buffer::lock(&shared)?;
            ensure_pixels(&*buffer)?;
            buffer.encode_snapshot()?
        };

        let image = tokio::task::spawn_blocking(move || snapshot.decode()).await??;

        let mut buffer = buffer::lock(&shared)?;
        buffer.set_filter(Filter::Blur {
            radius: style.blur_radius,
        });
        buffer.draw_image(&image, Some(&rect), &rect);
        buffer.set_filter(Filter::None);
        log::debug!("blur applied at {rect:?}");
        Ok::<_, RedactError>(())
    }
    .boxed()
}
