//! In-memory rendering surfaces
//!
//! This module contains:
//! - `Raster`, the `PixelBuffer` implementation backed by `image::RgbaImage`
//! - `OverlaySurface`, the preview layer the selection outline is drawn on
//!
//! Fills and strokes go through tiny-skia; crops, blurs and compositing
//! through the `image` crate.

pub mod overlay;
pub mod raster;

pub use overlay::{Overlay, OverlaySurface};
pub use raster::Raster;

use image::RgbaImage;
use tiny_skia::Pixmap;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}
