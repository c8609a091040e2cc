//! Screen coordinates.
//!
//! All coordinates are device pixels after the display scale has been
//! applied.  Points are never negative: anything below zero is clamped at the
//! point of construction.

use serde::{Deserialize, Serialize};

/// A non-negative position on the controlled device's screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a point, clamping both coordinates to be `>= 0`.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: x.max(0),
            y: y.max(0),
        }
    }

    /// Manhattan distance between two points.
    ///
    /// Used for movement thresholds; it is cheaper than the Euclidean distance
    /// and matches how the threshold constants were tuned.
    pub fn manhattan_distance(self, other: Point) -> i32 {
        let d = self
            .x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    /// Extrapolates one step beyond `self` along the vector `from -> self`.
    ///
    /// The result is clamped to the non-negative quadrant and saturates at
    /// `i32::MAX`.
    pub fn extrapolate_from(self, from: Point) -> Point {
        Point::new(
            self.x.saturating_add(self.x.saturating_sub(from.x)),
            self.y.saturating_add(self.y.saturating_sub(from.y)),
        )
    }
}

/// Screen-space bounds of a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }
}
