//! Wheel batching: one scroll swipe at a time, spaced by a settle delay.
//!
//! Each wheel tick becomes a short vertical swipe.  Swipes that overlap are
//! merged or dropped by the host, so ticks are queued and released one by
//! one: the first tick of a burst is dispatched immediately, and each
//! following tick waits until the settle delay of the previous one has
//! passed.  The router owns the timer; it calls
//! [`WheelBatcher::on_settled`] when the delay expires.

use std::collections::VecDeque;

use touchbridge_core::{Point, ScrollDirection, Stroke, StrokePath};
use tracing::debug;

use super::tuning::WheelTuning;

/// What happened to a scroll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollDecision {
    /// Dispatch this swipe now and start the settle timer.
    Dispatch(Stroke),
    /// Queued behind a swipe that is still settling.
    Queued,
    /// The swipe would leave the screen and was dropped.
    Dropped,
}

/// Queues scroll swipes and paces their dispatch.
pub struct WheelBatcher {
    pending: VecDeque<Stroke>,
    polling: bool,
    tuning: WheelTuning,
}

impl WheelBatcher {
    pub fn new(tuning: WheelTuning) -> Self {
        Self {
            pending: VecDeque::new(),
            polling: false,
            tuning,
        }
    }

    /// Delay to wait after each dispatch.
    pub fn settle_delay(&self) -> std::time::Duration {
        self.tuning.settle_delay()
    }

    /// Whether a swipe is settling.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Builds a swipe from `at` in `direction` and queues it.
    pub fn enqueue(&mut self, direction: ScrollDirection, at: Point) -> ScrollDecision {
        let step = self.tuning.step;
        let end = match direction {
            ScrollDirection::Up => {
                if at.y < step {
                    debug!(y = at.y, step, "scroll swipe would leave the screen; dropped");
                    return ScrollDecision::Dropped;
                }
                Point::new(at.x, at.y - step)
            }
            ScrollDirection::Down => Point::new(at.x, at.y.saturating_add(step)),
        };
        let stroke = Stroke::new(
            StrokePath::starting_at(at).with_line_to(end),
            self.tuning.duration,
            false,
        );
        self.pending.push_back(stroke);
        self.poll()
    }

    /// The settle delay of the last dispatch expired.  Returns the next swipe
    /// to dispatch, if any; when the queue is drained polling stops.
    pub fn on_settled(&mut self) -> Option<Stroke> {
        self.polling = false;
        match self.poll() {
            ScrollDecision::Dispatch(stroke) => Some(stroke),
            ScrollDecision::Queued | ScrollDecision::Dropped => None,
        }
    }

    fn poll(&mut self) -> ScrollDecision {
        if self.polling {
            return ScrollDecision::Queued;
        }
        match self.pending.pop_front() {
            Some(stroke) => {
                self.polling = true;
                ScrollDecision::Dispatch(stroke)
            }
            None => ScrollDecision::Queued,
        }
    }
}
