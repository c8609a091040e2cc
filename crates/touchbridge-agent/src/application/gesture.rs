//! Gesture synthesis: turns pointer positions into chained strokes.
//!
//! A gesture is opened by [`GestureEngine::start`], extended by
//! [`GestureEngine::continue_to`] once per movement, and closed by
//! [`GestureEngine::end`].  Each call produces one stroke, which is appended
//! to the engine's [`StrokeQueue`]; whatever the queue releases is returned
//! to the caller for dispatch.
//!
//! # Why chain short strokes? (for beginners)
//!
//! The remote pointer arrives as discrete positions over time, but the host
//! only plays complete paths.  Building one long path and dispatching it at
//! the end would make the on-screen finger lag the whole drag.  Instead every
//! movement is dispatched as its own segment marked "will continue", and the
//! host stitches the segments into one uninterrupted touch.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use touchbridge_core::{
    domain::stroke::MIN_STROKE_DURATION,
    protocol::DispatchTicket,
    Point, PointerState, Stroke, StrokeOutcome, StrokePath,
};
use tracing::{debug, warn};

use super::stroke_queue::{Dispatch, StrokeQueue};
use super::tuning::FLING_DURATION_MULTIPLIER;

/// Error type for gesture operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GestureError {
    /// Continue or end was requested with no gesture open.  This happens when
    /// a lifecycle race (a timer ending the gesture just before the matching
    /// button-up) reorders events; the request is dropped.
    #[error("no active stroke to {0}")]
    NoActiveStroke(&'static str),
}

/// How a gesture's final stroke is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndPolicy {
    /// Lift the finger where the path currently ends, with minimal duration.
    /// Used for taps and long-presses.
    Hold,
    /// Extend the path one more step along the last movement vector so the
    /// host's gesture recognizer sees release momentum.  Used for drags.
    Fling,
}

struct ActiveGesture {
    /// Where the next segment starts.
    anchor: Point,
    last_segment_at: Instant,
    last_segment: Duration,
}

/// Owns the pointer state and the stroke queue.
pub struct GestureEngine {
    pointer: PointerState,
    active: Option<ActiveGesture>,
    queue: StrokeQueue,
    fling_multiplier: u32,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(FLING_DURATION_MULTIPLIER)
    }
}

impl GestureEngine {
    pub fn new(fling_multiplier: u32) -> Self {
        Self {
            pointer: PointerState::default(),
            active: None,
            queue: StrokeQueue::new(),
            fling_multiplier: fling_multiplier.max(1),
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    /// Whether a gesture is open.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn queue(&self) -> &StrokeQueue {
        &self.queue
    }

    /// Opens a new gesture at `at`.
    ///
    /// An already-open gesture is abandoned; the host will drop its
    /// continuation chain when the new initial stroke arrives.
    pub fn start(&mut self, at: Point, now: Instant) -> Option<Dispatch> {
        if self.active.is_some() {
            warn!("starting a gesture while another is open; abandoning the old one");
        }
        debug!("start gesture ({},{})", at.x, at.y);
        self.active = Some(ActiveGesture {
            anchor: at,
            last_segment_at: now,
            last_segment: MIN_STROKE_DURATION,
        });
        let stroke = Stroke::new(StrokePath::starting_at(at), MIN_STROKE_DURATION, true);
        self.queue.push(stroke)
    }

    /// Extends the open gesture with a segment to `at`.
    ///
    /// The segment lasts as long as the wall-clock time since the previous
    /// segment, so the host replays the drag at the operator's speed.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NoActiveStroke`] if no gesture is open.
    pub fn continue_to(&mut self, at: Point, now: Instant) -> Result<Option<Dispatch>, GestureError> {
        let active = self
            .active
            .as_mut()
            .ok_or(GestureError::NoActiveStroke("continue"))?;

        let elapsed = now
            .saturating_duration_since(active.last_segment_at)
            .max(MIN_STROKE_DURATION);
        let path = StrokePath::starting_at(active.anchor).with_line_to(at);
        debug!(
            "continue gesture ({},{}) -> ({},{}), duration {:?}",
            active.anchor.x, active.anchor.y, at.x, at.y, elapsed
        );

        active.anchor = at;
        active.last_segment_at = now;
        active.last_segment = elapsed;

        Ok(self.queue.push(Stroke::new(path, elapsed, true)))
    }

    /// Closes the open gesture at `at` using `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NoActiveStroke`] if no gesture is open.
    pub fn end(&mut self, at: Point, policy: EndPolicy) -> Result<Option<Dispatch>, GestureError> {
        let active = self.active.take().ok_or(GestureError::NoActiveStroke("end"))?;

        let stroke = match policy {
            EndPolicy::Hold => {
                debug!("end gesture: hold at ({},{})", active.anchor.x, active.anchor.y);
                Stroke::new(
                    StrokePath::starting_at(active.anchor).with_line_to(active.anchor),
                    MIN_STROKE_DURATION,
                    false,
                )
            }
            EndPolicy::Fling => {
                let extended = at.extrapolate_from(self.pointer.previous());
                let duration = active.last_segment * self.fling_multiplier;
                debug!(
                    "end gesture: fling from ({},{}) to ({},{}), duration {:?}",
                    at.x, at.y, extended.x, extended.y, duration
                );
                Stroke::new(
                    StrokePath::starting_at(active.anchor).with_line_to(extended),
                    duration,
                    false,
                )
            }
        };

        Ok(self.queue.push(stroke))
    }

    /// Forwards the host's outcome for a dispatched stroke to the queue and
    /// returns the next stroke to dispatch, if any.
    pub fn on_stroke_finished(
        &mut self,
        ticket: DispatchTicket,
        outcome: StrokeOutcome,
    ) -> Option<Dispatch> {
        self.queue.finish(ticket, outcome)
    }
}
