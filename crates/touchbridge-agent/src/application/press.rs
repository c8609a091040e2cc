//! Press disambiguation: tap, drag or long-press.
//!
//! A primary button press arrives as a down, some moves, and an up.  Which
//! gesture that sequence means depends on how far the pointer travelled and
//! how long the button stayed down:
//!
//! ```text
//!            down                 tap window             long-press timeout
//!  Idle ───────────► ArmedForTap ───────────► LongPressArmed ───────────► Idle
//!                        │  │                     │                      (ends as hold)
//!               up (tap) │  │ move > threshold    │ move > threshold
//!                        ▼  ▼                     ▼
//!                      Idle  Dragging ◄───────────┘
//!                              │ up (ends as fling)
//!                              ▼
//!                             Idle
//! ```
//!
//! The disambiguator only decides; the router carries the decisions out on
//! the gesture engine and the timer service.

use tokio::time::Instant;
use touchbridge_core::Point;
use tracing::debug;

use super::gesture::EndPolicy;
use super::tuning::GestureTuning;

/// State of the primary button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    Idle,
    ArmedForTap { armed_at: Instant, origin: Point },
    Dragging,
    LongPressArmed { armed_at: Instant, origin: Point },
}

/// What a primary-down should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownDecision {
    /// Open a gesture and arm the tap-window and long-press timers.
    Arm,
    /// The down followed an up too closely and is dropped as bounce.
    Dropped,
}

/// What a move should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDecision {
    /// No press in progress; only the pointer position changes.
    Hover,
    /// The press is still within the movement threshold; nothing to draw.
    Hold,
    /// The press just crossed the movement threshold.  Cancel the press
    /// timers and continue the gesture.
    BeginDrag,
    /// Already dragging; continue the gesture.
    Drag,
}

/// Classifies primary-button sequences.
pub struct PressDisambiguator {
    state: PressState,
    last_up: Option<Instant>,
    tuning: GestureTuning,
}

impl PressDisambiguator {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            state: PressState::Idle,
            last_up: None,
            tuning,
        }
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    /// Whether a press is held without having turned into a drag.
    pub fn is_long_press_armed(&self) -> bool {
        matches!(
            self.state,
            PressState::ArmedForTap { .. } | PressState::LongPressArmed { .. }
        )
    }

    pub fn on_down(&mut self, at: Point, now: Instant) -> DownDecision {
        if let Some(up) = self.last_up {
            if now.saturating_duration_since(up) < self.tuning.double_click_guard {
                debug!("double click blocked");
                return DownDecision::Dropped;
            }
        }
        self.state = PressState::ArmedForTap {
            armed_at: now,
            origin: at,
        };
        DownDecision::Arm
    }

    pub fn on_move(&mut self, at: Point) -> MoveDecision {
        match self.state {
            PressState::Idle => MoveDecision::Hover,
            PressState::Dragging => MoveDecision::Drag,
            PressState::ArmedForTap { origin, .. } | PressState::LongPressArmed { origin, .. } => {
                let delta = at.manhattan_distance(origin);
                if delta > self.tuning.move_threshold {
                    debug!(delta, "press became a drag");
                    self.state = PressState::Dragging;
                    MoveDecision::BeginDrag
                } else {
                    MoveDecision::Hold
                }
            }
        }
    }

    /// Returns how to end the gesture, or `None` if no press was in progress.
    ///
    /// Every up is remembered for the double-click guard, including ups that
    /// arrive after a long-press already ended the gesture.
    pub fn on_up(&mut self, now: Instant) -> Option<EndPolicy> {
        self.last_up = Some(now);
        let policy = match self.state {
            PressState::Idle => None,
            PressState::ArmedForTap { .. } => {
                debug!("press ended as tap");
                Some(EndPolicy::Hold)
            }
            PressState::LongPressArmed { armed_at, .. } => {
                debug!(held = ?now.saturating_duration_since(armed_at), "press released while long-press armed");
                Some(EndPolicy::Hold)
            }
            PressState::Dragging => Some(EndPolicy::Fling),
        };
        self.state = PressState::Idle;
        policy
    }

    /// The tap window elapsed with the press still held in place.
    pub fn on_tap_window_elapsed(&mut self) {
        if let PressState::ArmedForTap { armed_at, origin } = self.state {
            self.state = PressState::LongPressArmed { armed_at, origin };
        }
    }

    /// The long-press timeout elapsed.  Returns the end policy when the press
    /// is still held in place; the press is over afterwards.
    pub fn on_long_press_timeout(&mut self) -> Option<EndPolicy> {
        match self.state {
            PressState::ArmedForTap { .. } | PressState::LongPressArmed { .. } => {
                debug!("long press timeout reached");
                self.state = PressState::Idle;
                Some(EndPolicy::Hold)
            }
            PressState::Idle | PressState::Dragging => None,
        }
    }

    /// Forgets any press in progress.
    pub fn reset(&mut self) {
        self.state = PressState::Idle;
    }
}
