//! Core geometry types for the layout engine

use serde::{Deserialize, Serialize};

/// A 2D point in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle occupied by a widget
///
/// Width and height are expected to be non-negative; negative extents are a
/// caller bug and give unspecified results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Strict overlap test.
    ///
    /// Boxes that only share an edge do not intersect, so widgets may sit
    /// flush against each other.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Size of the overlapping region, or `None` when the boxes don't intersect
    pub fn overlap(&self, other: &Bounds) -> Option<(f64, f64)> {
        if !self.intersects(other) {
            return None;
        }
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        Some((w, h))
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds::new(x, y, right - x, bottom - y)
    }

    /// Same size, moved to a new origin
    pub fn moved_to(&self, x: f64, y: f64) -> Bounds {
        Bounds::new(x, y, self.width, self.height)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Bounds {
        self.moved_to(self.x + dx, self.y + dy)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::zero()
    }
}

/// Pixel extent of the dashboard canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
