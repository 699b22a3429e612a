//! Redaction operations, dispatched by kind
//!
//! Adding a kind means one `RedactionKind` variant and one `register` call
//! in `RedactionLibrary::standard`.

pub mod ops;

use std::collections::HashMap;

use futures::future::BoxFuture;
use image::Rgba;

use crate::buffer::{PixelBuffer, SharedBuffer};
use crate::domain::{Action, RedactionKind, Rectangle};
use crate::error::{RedactError, Result};

/// Deferred buffer mutation produced by an operation
pub type Job = BoxFuture<'static, Result<()>>;

/// Builds the job that applies one redaction kind over a rectangle
pub type Operation<B> = fn(Rectangle, SharedBuffer<B>, RedactionStyle) -> Job;

/// Parameters shared by every operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedactionStyle {
    /// Fill colour for black-out; expected to be opaque
    pub fill: Rgba<u8>,
    /// Blur standard deviation in pixels
    pub blur_radius: f32,
}

impl Default for RedactionStyle {
    fn default() -> Self {
        Self {
            fill: Rgba([0, 0, 0, 255]),
            blur_radius: 5.0,
        }
    }
}

/// Lookup table from redaction kind to operation
pub struct RedactionLibrary<B> {
    operations: HashMap<RedactionKind, Operation<B>>,
    style: RedactionStyle,
}

impl<B: PixelBuffer> RedactionLibrary<B> {
    /// Library with no operations registered
    pub fn empty(style: RedactionStyle) -> Self {
        Self {
            operations: HashMap::new(),
            style,
        }
    }

    /// Library with black-out and blur registered
    pub fn standard(style: RedactionStyle) -> Self {
        let mut library = Self::empty(style);
        library.register(RedactionKind::BlackOut, ops::black_out::<B>);
        library.register(RedactionKind::Blur, ops::blur::<B>);
        library
    }

    /// Register `operation` for `kind`, returning the one it replaces
    pub fn register(&mut self, kind: RedactionKind, operation: Operation<B>) -> Option<Operation<B>> {
        self.operations.insert(kind, operation)
    }

    pub fn supports(&self, kind: RedactionKind) -> bool {
        self.operations.contains_key(&kind)
    }

    pub fn style(&self) -> RedactionStyle {
        self.style
    }

    /// Build the job for `action` against `buffer`
    pub fn job(&self, action: &Action, buffer: &SharedBuffer<B>) -> Result<Job> {
        let operation = self
            .operations
            .get(&action.kind())
            .ok_or(RedactError::UnregisteredKind(action.kind()))?;
        Ok(operation(action.rect(), buffer.clone(), self.style))
    }
}

impl<B: PixelBuffer> Default for RedactionLibrary<B> {
    fn default() -> Self {
        Self::standard(RedactionStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{self, share};
    use crate::render::Raster;

    const PAPER: Rgba<u8> = Rgba([250, 250, 250, 255]);

    fn checkerboard(size: u32) -> Raster {
        Raster::from_image(image::RgbaImage::from_fn(size, size, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([20, 20, 20, 255])
            }
        }))
    }

    #[tokio::test]
    async fn test_black_out_is_idempotent() {
        let library = RedactionLibrary::<Raster>::default();
        let shared = share(Raster::filled(100, 100, PAPER));
        let action = Action::black_out(Rectangle::new(10.0, 10.0, 40.0, 40.0));

        library.job(&action, &shared).unwrap().await.unwrap();
        let once = buffer::lock(&shared).unwrap().image().clone();
        library.job(&action, &shared).unwrap().await.unwrap();
        let twice = buffer::lock(&shared).unwrap().image().clone();

        assert_eq!(once, twice);
        assert_eq!(*once.get_pixel(20, 20), Rgba([0, 0, 0, 255]));
        assert_eq!(*once.get_pixel(50, 50), PAPER);
    }

    #[tokio::test]
    async fn test_blur_changes_only_the_rectangle() {
        let library = RedactionLibrary::<Raster>::default();
        let original = checkerboard(64);
        let shared = share(original.clone());
        let rect = Rectangle::new(16.0, 16.0, 48.0, 48.0);

        library.job(&Action::blur(rect), &shared).unwrap().await.unwrap();

        let blurred = buffer::lock(&shared).unwrap().clone();
        let mut changed_inside = 0;
        for (x, y, p) in blurred.image().enumerate_pixels() {
            let inside = rect.to_pixel_bounds(64, 64).unwrap().contains(x, y);
            if inside {
                changed_inside += usize::from(*p != original.pixel(x, y));
            } else {
                assert_eq!(*p, original.pixel(x, y), "pixel ({x}, {y}) outside changed");
            }
        }
        assert!(changed_inside > 0);
    }

    /// Opaque gradient, distinct per pixel
    fn gradient(size: u32) -> Raster {
        Raster::from_image(image::RgbaImage::from_fn(size, size, |x, y| {
            Rgba([(x % 251) as u8, (y % 241) as u8, ((x * y) % 256) as u8, 255])
        }))
    }

    #[tokio::test]
    async fn test_blur_across_buffer_edge() {
        let library = RedactionLibrary::<Raster>::default();
        for rect in [
            Rectangle::new(450.0, 450.0, 550.0, 550.0),
            Rectangle::new(-50.0, 100.0, 50.0, 200.0),
            Rectangle::new(10.4, 10.4, 20.6, 20.6),
        ] {
            let original = gradient(500);
            let shared = share(original.clone());
            library.job(&Action::blur(rect), &shared).unwrap().await.unwrap();

            let bounds = rect.to_pixel_bounds(500, 500).unwrap();
            let blurred = buffer::lock(&shared).unwrap().clone();
            let mut changed_inside = 0;
            for (x, y, p) in blurred.image().enumerate_pixels() {
                if bounds.contains(x, y) {
                    changed_inside += usize::from(*p != original.pixel(x, y));
                } else {
                    assert_eq!(*p, original.pixel(x, y), "{rect:?}: pixel ({x}, {y}) outside changed");
                }
            }
            assert!(changed_inside > 0, "{rect:?}");
        }
    }

    #[tokio::test]
    async fn test_blur_compounds() {
        let library = RedactionLibrary::<Raster>::default();
        let shared = share(checkerboard(64));
        let action = Action::blur(Rectangle::new(8.0, 8.0, 56.0, 56.0));

        library.job(&action, &shared).unwrap().await.unwrap();
        let once = buffer::lock(&shared).unwrap().image().clone();
        library.job(&action, &shared).unwrap().await.unwrap();
        let twice = buffer::lock(&shared).unwrap().image().clone();

        assert_ne!(once, twice);
    }

    #[tokio::test]
    async fn test_unregistered_kind() {
        let library = RedactionLibrary::<Raster>::empty(RedactionStyle::default());
        let shared = share(Raster::new(10, 10));
        let err = library
            .job(&Action::blur(Rectangle::new(0.0, 0.0, 5.0, 5.0)), &shared)
            .err()
            .unwrap();
        assert!(matches!(err, RedactError::UnregisteredKind(RedactionKind::Blur)));
        assert!(!library.supports(RedactionKind::BlackOut));
    }

    #[tokio::test]
    async fn test_empty_buffer_fails_fast() {
        let library = RedactionLibrary::<Raster>::default();
        let shared = share(Raster::new(0, 0));
        let job = library
            .job(&Action::blur(Rectangle::new(0.0, 0.0, 5.0, 5.0)), &shared)
            .unwrap();
        assert!(matches!(job.await, Err(RedactError::EmptyBuffer { .. })));
    }
}
