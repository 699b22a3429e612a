//! Preview layer for the selection outline
//!
//! Lives on its own surface above the pixel buffer, so drawing the outline
//! never touches redacted content.

use image::{Rgba, RgbaImage};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};

use super::with_pixmap;
use crate::domain::Rectangle;

/// Surface the selection controller draws its preview on
pub trait Overlay {
    fn stroke_rect(&mut self, rect: &Rectangle, color: Rgba<u8>, width: f32);

    fn clear(&mut self);
}

/// Transparent `RgbaImage` overlay
#[derive(Clone, Debug)]
pub struct OverlaySurface {
    image: RgbaImage,
}

impl OverlaySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// True if nothing is drawn on the overlay
    pub fn is_clear(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }
}

impl Overlay for OverlaySurface {
    fn stroke_rect(&mut self, rect: &Rectangle, color: Rgba<u8>, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(rect.x0(), rect.y0());
        pb.line_to(rect.x1(), rect.y0());
        pb.line_to(rect.x1(), rect.y1());
        pb.line_to(rect.x0(), rect.y1());
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };

        let [r, g, b, a] = color.0;
        with_pixmap(&mut self.image, |pixmap| {
            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = true;

            let stroke = Stroke {
                width,
                line_cap: LineCap::Square,
                line_join: LineJoin::Miter,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        });
    }

    fn clear(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_outline_is_drawn_on_border_only() {
        let mut overlay = OverlaySurface::new(100, 100);
        overlay.stroke_rect(&Rectangle::new(20.0, 20.0, 80.0, 80.0), BLUE, 2.0);

        assert!(!overlay.is_clear());
        assert_ne!(overlay.image().get_pixel(20, 50).0[3], 0);
        // Interior stays transparent
        assert_eq!(overlay.image().get_pixel(50, 50).0[3], 0);
    }

    #[test]
    fn test_clear_erases_everything() {
        let mut overlay = OverlaySurface::new(50, 50);
        overlay.stroke_rect(&Rectangle::new(5.0, 5.0, 45.0, 45.0), BLUE, 2.0);
        overlay.clear();
        assert!(overlay.is_clear());
    }
}
