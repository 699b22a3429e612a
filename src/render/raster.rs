//! `PixelBuffer` backed by an `RgbaImage`

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tiny_skia::{Paint, Transform};

use super::with_pixmap;
use crate::buffer::{Filter, PixelBuffer, Snapshot};
use crate::domain::Rectangle;
use crate::error::Result;

/// Default fill: opaque black
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Clone, Debug)]
pub struct Raster {
    image: RgbaImage,
    fill: Rgba<u8>,
    filter: Filter,
}

impl Raster {
    /// Fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, color))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            fill: BLACK,
            filter: Filter::None,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }
}

impl PixelBuffer for Raster {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_fill_color(&mut self, color: Rgba<u8>) {
        self.fill = color;
    }

    fn fill_rect(&mut self, rect: &Rectangle) {
        let Some(bounds) = rect.to_pixel_bounds(self.width(), self.height()) else {
            return;
        };
        let Some(area) = tiny_skia::Rect::from_xywh(
            bounds.x as f32,
            bounds.y as f32,
            bounds.width() as f32,
            bounds.height() as f32,
        ) else {
            return;
        };

        let [r, g, b, a] = self.fill.0;
        with_pixmap(&mut self.image, |pixmap| {
            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = false;
            pixmap.fill_rect(area, &paint, Transform::identity(), None);
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, src: Option<&Rectangle>, dst: &Rectangle) {
        let src = src
            .copied()
            .unwrap_or_else(|| Rectangle::full(image.width(), image.height()));
        let Some((src, dst)) = clip_to_both(
            &src,
            dst,
            &Rectangle::full(image.width(), image.height()),
            &Rectangle::full(self.width(), self.height()),
        ) else {
            return;
        };
        let Some(src) = src.to_pixel_bounds(image.width(), image.height()) else {
            return;
        };
        let Some(dst) = dst.to_pixel_bounds(self.width(), self.height()) else {
            return;
        };

        let mut layer = imageops::crop_imm(image, src.x, src.y, src.width(), src.height()).to_image();
        if let Filter::Blur { radius } = self.filter
            && radius > 0.0
        {
            layer = imageops::blur(&layer, radius);
        }
        if (src.width(), src.height()) != (dst.width(), dst.height()) {
            layer = imageops::resize(&layer, dst.width(), dst.height(), FilterType::Triangle);
        }

        imageops::overlay(&mut self.image, &layer, dst.x as i64, dst.y as i64);
    }

    fn read_region(&self, rect: &Rectangle) -> Option<RgbaImage> {
        let bounds = rect.to_pixel_bounds(self.width(), self.height())?;
        Some(
            imageops::crop_imm(&self.image, bounds.x, bounds.y, bounds.width(), bounds.height())
                .to_image(),
        )
    }

    fn write_region(&mut self, x: u32, y: u32, region: &RgbaImage) {
        imageops::replace(&mut self.image, region, x as i64, y as i64);
    }

    fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    fn filter(&self) -> Filter {
        self.filter
    }

    fn encode_snapshot(&self) -> Result<Snapshot> {
        Snapshot::encode(&self.image)
    }
}

/// Clip `src` to `src_area` and `dst` to `dst_area`, trimming the other side
/// by the same proportion so the `src` -> `dst` mapping is unchanged
fn clip_to_both(
    src: &Rectangle,
    dst: &Rectangle,
    src_area: &Rectangle,
    dst_area: &Rectangle,
) -> Option<(Rectangle, Rectangle)> {
    if src.is_empty() || dst.is_empty() {
        return None;
    }
    let sx = dst.width() / src.width();
    let sy = dst.height() / src.height();
    let to_dst = |r: &Rectangle| {
        Rectangle::new(
            dst.x0() + (r.x0() - src.x0()) * sx,
            dst.y0() + (r.y0() - src.y0()) * sy,
            dst.x0() + (r.x1() - src.x0()) * sx,
            dst.y0() + (r.y1() - src.y0()) * sy,
        )
    };
    let to_src = |r: &Rectangle| {
        Rectangle::new(
            src.x0() + (r.x0() - dst.x0()) / sx,
            src.y0() + (r.y0() - dst.y0()) / sy,
            src.x0() + (r.x1() - dst.x0()) / sx,
            src.y0() + (r.y1() - dst.y0()) / sy,
        )
    };

    let src = src.intersect(src_area)?;
    let dst = to_dst(&src).intersect(dst_area)?;
    Some((to_src(&dst), dst))
}
