//! Strokes: the unit of work handed to the host's gesture dispatcher.
//!
//! # What is a stroke? (for beginners)
//!
//! The host cannot be told "the finger is now at (x, y)".  It can only be
//! handed a *path* together with a start delay and a duration, and it then
//! plays a finger along that path.  A stroke marked `will_continue` keeps the
//! virtual finger on the glass when it finishes, so the next stroke can pick
//! up where it left off.  A drag is therefore a chain of short continued
//! strokes, and the last stroke of the chain lifts the finger.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// The shortest duration the host accepts for a stroke.
///
/// Zero or negative durations are rejected by the host, so every computed
/// duration is clamped to at least this value.
pub const MIN_STROKE_DURATION: Duration = Duration::from_millis(1);

/// An ordered polyline.  Always contains at least one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokePath {
    points: Vec<Point>,
}

impl StrokePath {
    /// Opens a path at `origin`.
    pub fn starting_at(origin: Point) -> Self {
        Self {
            points: vec![origin],
        }
    }

    /// Appends a line segment from the current end to `to`.
    pub fn line_to(&mut self, to: Point) {
        self.points.push(to);
    }

    /// Builder form of [`StrokePath::line_to`].
    pub fn with_line_to(mut self, to: Point) -> Self {
        self.line_to(to);
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// One dispatchable stroke.
///
/// Immutable once built: produced by the gesture engine or the wheel batcher,
/// dispatched exactly once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    pub path: StrokePath,
    pub start_delay: Duration,
    pub duration: Duration,
    /// Whether the finger stays down for a following continuation stroke.
    pub will_continue: bool,
}

impl Stroke {
    /// Builds a stroke that starts immediately, clamping `duration` to
    /// [`MIN_STROKE_DURATION`].
    pub fn new(path: StrokePath, duration: Duration, will_continue: bool) -> Self {
        Self {
            path,
            start_delay: Duration::ZERO,
            duration: duration.max(MIN_STROKE_DURATION),
            will_continue,
        }
    }
}

/// How the host finished a dispatched stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeOutcome {
    Completed,
    Cancelled,
}

/// System-wide navigation actions the host can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalAction {
    Back,
    Home,
    Recents,
}

/// Direction in which a synthesized scroll swipe travels across the screen.
///
/// A wheel turned "down" scrolls content down, which on a touch screen is a
/// finger travelling *up*: [`ScrollDirection::Up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// The swipe travels towards `y = 0`.
    Up,
    /// The swipe travels away from `y = 0`.
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_new_clamps_zero_duration() {
        let stroke = Stroke::new(StrokePath::starting_at(Point::new(1, 1)), Duration::ZERO, true);
        assert_eq!(stroke.duration, MIN_STROKE_DURATION);
        assert_eq!(stroke.start_delay, Duration::ZERO);
    }

    #[test]
    fn test_stroke_path_tracks_first_and_last_points() {
        // Arrange
        let mut path = StrokePath::starting_at(Point::new(0, 0));

        // Act
        path.line_to(Point::new(5, 5));
        path.line_to(Point::new(9, 2));

        // Assert
        assert_eq!(path.first(), Point::new(0, 0));
        assert_eq!(path.last(), Point::new(9, 2));
        assert_eq!(path.points().len(), 3);
    }
}
