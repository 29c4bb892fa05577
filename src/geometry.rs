//! Axis-aligned canvas geometry.
//!
//! All coordinates are canvas pixels with the origin at the top-left and `y`
//! growing downwards, the same space block records are stored in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Rectangle with top-left corner `(x, y)` and the given size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_min_max(Point::new(x, y), Point::new(x + width, y + height))
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: Rect) -> bool {
        !(self.max.x <= other.min.x
            || other.max.x <= self.min.x
            || self.max.y <= other.min.y
            || other.max.y <= self.min.y)
    }

    /// Grow the rectangle by `margin` pixels on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::from_min_max(
            Point::new(self.min.x - margin, self.min.y - margin),
            Point::new(self.max.x + margin, self.max.y + margin),
        )
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Round a point to the nearest multiple of `grid_size` on both axes.
/// A non-positive grid leaves the point untouched.
pub fn snap_to_grid(p: Point, grid_size: f64) -> Point {
    if grid_size > 0.0 {
        Point::new(
            (p.x / grid_size).round() * grid_size,
            (p.y / grid_size).round() * grid_size,
        )
    } else {
        p
    }
}
