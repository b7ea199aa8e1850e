//! Geometric primitives for the canvas.
//!
//! Two coordinate spaces exist: *canvas* space (the infinite design surface,
//! in CSS pixels) and *window* space (the browser viewport). Everything the
//! strategy engine computes with lives in canvas space; window space only
//! appears at the input boundary.

use serde::{Deserialize, Serialize};

/// A point on the canvas, in canvas-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// A displacement between two canvas points.
///
/// Structurally identical to [`CanvasPoint`]; the alias keeps signatures
/// honest about whether a value is a position or an offset.
pub type CanvasVector = CanvasPoint;

/// A point in window (viewport) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The zero point / zero displacement.
#[inline]
pub const fn zero_canvas_point() -> CanvasPoint {
    CanvasPoint::new(0.0, 0.0)
}

/// Translate a point by a vector.
#[inline]
pub fn offset_point(point: CanvasPoint, by: CanvasVector) -> CanvasPoint {
    CanvasPoint::new(point.x + by.x, point.y + by.y)
}

/// The vector from `from` to `to`.
#[inline]
pub fn point_difference(from: CanvasPoint, to: CanvasPoint) -> CanvasVector {
    CanvasPoint::new(to.x - from.x, to.y - from.y)
}

impl std::ops::Add for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, rhs: CanvasPoint) -> CanvasPoint {
        offset_point(self, rhs)
    }
}

impl std::ops::Sub for CanvasPoint {
    type Output = CanvasPoint;

    fn sub(self, rhs: CanvasPoint) -> CanvasPoint {
        point_difference(rhs, self)
    }
}

/// An axis-aligned rectangle in canvas space.
///
/// Edges are half-open: `x`/`y` are inclusive, `right()`/`bottom()` are
/// exclusive. A point sitting exactly on a shared edge between two adjacent
/// rectangles is therefore inside the later one only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment test.
    #[inline]
    pub fn contains(&self, point: CanvasPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    #[inline]
    pub fn origin(&self) -> CanvasPoint {
        CanvasPoint::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.center_x(), self.center_y())
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Map a canvas-space point into window space given the current canvas zoom
/// and pan offset.
pub fn canvas_point_to_window_point(
    point: CanvasPoint,
    canvas_scale: f64,
    canvas_offset: CanvasVector,
) -> WindowPoint {
    WindowPoint {
        x: (point.x + canvas_offset.x) * canvas_scale,
        y: (point.y + canvas_offset.y) * canvas_scale,
    }
}

/// Inverse of [`canvas_point_to_window_point`].
pub fn window_point_to_canvas_point(
    point: WindowPoint,
    canvas_scale: f64,
    canvas_offset: CanvasVector,
) -> CanvasPoint {
    CanvasPoint {
        x: point.x / canvas_scale - canvas_offset.x,
        y: point.y / canvas_scale - canvas_offset.y,
    }
}
