//! Timing and distance constants for gesture synthesis.
//!
//! Every constant has a field of the same meaning on [`GestureTuning`] or
//! [`WheelTuning`], so a config file can override it.  The `Default` impls
//! are built from the constants.

use std::time::Duration;

/// A primary-down arriving sooner than this after the previous primary-up is
/// treated as bounce and dropped.
pub const DOUBLE_CLICK_GUARD: Duration = Duration::from_millis(10);

/// How long a press may stay put and still be a tap.
pub const TAP_WINDOW: Duration = Duration::from_millis(120);

/// How long a press must stay put to end as a long-press.
pub const LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(600);

/// Manhattan distance from the press origin beyond which a press becomes a drag.
pub const MOVE_THRESHOLD: i32 = 8;

/// The extrapolated fling segment lasts this many times the last segment.
pub const FLING_DURATION_MULTIPLIER: u32 = 3;

/// Wheel-button hold time that turns "home" into "recents".
pub const RECENTS_DELAY: Duration = Duration::from_millis(200);

/// Vertical length of one synthesized scroll swipe.
pub const WHEEL_STEP: i32 = 120;

/// Duration of one synthesized scroll swipe.
pub const WHEEL_DURATION: Duration = Duration::from_millis(50);

/// Extra pause after a scroll swipe before the next one is dispatched.
pub const WHEEL_SETTLE_MARGIN: Duration = Duration::from_millis(10);

/// Press, drag and navigation timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTuning {
    pub double_click_guard: Duration,
    pub tap_window: Duration,
    pub long_press_timeout: Duration,
    pub move_threshold: i32,
    pub fling_duration_multiplier: u32,
    pub recents_delay: Duration,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            double_click_guard: DOUBLE_CLICK_GUARD,
            tap_window: TAP_WINDOW,
            long_press_timeout: LONG_PRESS_TIMEOUT,
            move_threshold: MOVE_THRESHOLD,
            fling_duration_multiplier: FLING_DURATION_MULTIPLIER,
            recents_delay: RECENTS_DELAY,
        }
    }
}

/// Scroll swipe geometry and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelTuning {
    pub step: i32,
    pub duration: Duration,
    pub settle_margin: Duration,
}

impl WheelTuning {
    /// Delay between two wheel dispatches.
    pub fn settle_delay(&self) -> Duration {
        self.duration + self.settle_margin
    }
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            step: WHEEL_STEP,
            duration: WHEEL_DURATION,
            settle_margin: WHEEL_SETTLE_MARGIN,
        }
    }
}
