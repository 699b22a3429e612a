//! The pixel surface redactions operate on
//!
//! `PixelBuffer` is the contract the embedding surface implements;
//! `render::Raster` is the in-memory implementation shipped with the crate.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use image::{Rgba, RgbaImage};

use crate::domain::Rectangle;
use crate::error::{RedactError, Result};

/// Filter applied to `draw_image` while enabled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Filter {
    #[default]
    None,
    /// Gaussian blur with this standard deviation in pixels
    Blur { radius: f32 },
}

/// A mutable raster surface.
///
/// Coordinates are buffer pixels with the origin at the top-left. Rectangles
/// that reach outside the buffer are clipped; rectangles with no area inside
/// the buffer leave it untouched.
pub trait PixelBuffer: Send + 'static {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Colour used by subsequent `fill_rect` calls
    fn set_fill_color(&mut self, color: Rgba<u8>);

    fn fill_rect(&mut self, rect: &Rectangle);

    /// Draw `image` (or the `src` crop of it) into `dst`, through the current filter.
    ///
    /// Parts of `src` outside the image or of `dst` outside the buffer are
    /// clipped from both rectangles, keeping the mapping between them.
    fn draw_image(&mut self, image: &RgbaImage, src: Option<&Rectangle>, dst: &Rectangle);

    /// Copy out a region, `None` if it lies entirely outside the buffer
    fn read_region(&self, rect: &Rectangle) -> Option<RgbaImage>;

    /// Overwrite pixels starting at `(x, y)`, without blending
    fn write_region(&mut self, x: u32, y: u32, region: &RgbaImage);

    fn set_filter(&mut self, filter: Filter);

    fn filter(&self) -> Filter;

    /// Encode the whole raster into a portable snapshot
    fn encode_snapshot(&self) -> Result<Snapshot>;
}

/// PNG-encoded copy of a raster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    png: Vec<u8>,
}

impl Snapshot {
    pub fn encode(image: &RgbaImage) -> Result<Self> {
        let mut png = Vec::new();
        write_png(&mut png, image)?;
        Ok(Self { png })
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    /// Decode back into pixels. Blocking; call it off the event loop.
    pub fn decode(&self) -> Result<RgbaImage> {
        let image =
            image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)?.into_rgba8();
        Ok(image)
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Buffer handle shared between the log and its queued jobs
pub type SharedBuffer<B> = Arc<Mutex<B>>;

pub fn share<B: PixelBuffer>(buffer: B) -> SharedBuffer<B> {
    Arc::new(Mutex::new(buffer))
}

/// Lock the buffer. Never hold the guard across an await.
pub fn lock<B>(buffer: &SharedBuffer<B>) -> Result<MutexGuard<'_, B>> {
    buffer.lock().map_err(|_| RedactError::PoisonedBuffer)
}
