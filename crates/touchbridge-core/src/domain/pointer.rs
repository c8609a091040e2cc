//! The remote pointer as seen by the gesture engine.

use super::geometry::Point;

/// Current and previous pointer position plus primary-button state.
///
/// One instance exists per session.  It is owned by the gesture engine and is
/// only ever mutated from the session's event-processing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    pub x: i32,
    pub y: i32,
    pub last_x: i32,
    pub last_y: i32,
    pub button_down: bool,
}

impl PointerState {
    /// The current pointer position.
    pub fn position(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// The position before the most recent move.
    pub fn previous(&self) -> Point {
        Point {
            x: self.last_x,
            y: self.last_y,
        }
    }

    /// Moves the pointer, remembering the old position for extrapolation.
    ///
    /// A move to the position the pointer already occupies is ignored so that
    /// a button event repeating the last coordinates does not erase the
    /// movement vector.
    pub fn move_to(&mut self, to: Point) {
        if to == self.position() {
            return;
        }
        self.last_x = self.x;
        self.last_y = self.y;
        self.x = to.x;
        self.y = to.y;
    }

    /// Places the pointer without recording a movement vector.
    pub fn seat_at(&mut self, at: Point) {
        self.x = at.x;
        self.y = at.y;
        self.last_x = at.x;
        self.last_y = at.y;
    }
}
