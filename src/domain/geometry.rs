//! Geometric types for selections and pixel regions

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A position in buffer-local coordinates (origin at the buffer's top-left)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this point by `-origin`, turning page coordinates into local ones
    pub fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Normalized axis-aligned rectangle: `x0 <= x1` and `y0 <= y1` always hold
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRectangle")]
pub struct Rectangle {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl Rectangle {
    /// Build from arbitrary corner coordinates, swapping each axis as needed
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let (x0, x1) = if x1 < x0 { (x1, x0) } else { (x0, x1) };
        let (y0, y1) = if y1 < y0 { (y1, y0) } else { (y0, y1) };
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle spanned by two drag points, in either order
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn x0(&self) -> f32 {
        self.x0
    }

    pub fn y0(&self) -> f32 {
        self.y0
    }

    pub fn x1(&self) -> f32 {
        self.x1
    }

    pub fn y1(&self) -> f32 {
        self.y1
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// True when the rectangle covers no area (a click, or a straight line)
    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Overlap of two rectangles, `None` if they share no area
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);
        (x0 < x1 && y0 < y1).then_some(Rectangle { x0, y0, x1, y1 })
    }

    /// The whole of a `width` x `height` buffer
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Round to whole pixels and clip to a `width` x `height` buffer.
    ///
    /// Returns `None` when nothing of the rectangle lands inside the buffer.
    pub fn to_pixel_bounds(&self, width: u32, height: u32) -> Option<PixelBounds> {
        let clamp = |v: f32, max: u32| (v.round().max(0.0) as u32).min(max);
        let left = clamp(self.x0, width);
        let top = clamp(self.y0, height);
        let right = clamp(self.x1, width);
        let bottom = clamp(self.y1, height);
        Some(PixelBounds {
            x: left,
            y: top,
            width: NonZeroU32::new(right - left)?,
            height: NonZeroU32::new(bottom - top)?,
        })
    }
}

#[derive(Deserialize)]
struct RawRectangle {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl From<RawRectangle> for Rectangle {
    fn from(raw: RawRectangle) -> Self {
        Rectangle::new(raw.x0, raw.y0, raw.x1, raw.y1)
    }
}

/// Integer pixel region with non-zero dimensions, inside some buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl PixelBounds {
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width() && y >= self.y && y < self.y + self.height()
    }
}
