//! FIFO of strokes waiting for the host, with at most one in flight.
//!
//! The host accepts a single stroke sequence at a time.  Dispatching a second
//! stroke while one is still playing makes the host reject or overlap them,
//! so every stroke goes through this queue: the head is dispatched, and the
//! next one is only released when the host's completion (or cancellation)
//! for the head arrives.

use std::collections::VecDeque;

use touchbridge_core::{
    protocol::{DispatchTicket, TicketCounter},
    Stroke, StrokeOutcome,
};
use tracing::{debug, warn};

/// A stroke released for dispatch, tagged with its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: DispatchTicket,
    pub stroke: Stroke,
}

/// Serializes stroke dispatch.
#[derive(Default)]
pub struct StrokeQueue {
    pending: VecDeque<Stroke>,
    in_flight: Option<DispatchTicket>,
    tickets: TicketCounter,
}

impl StrokeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stroke.
    ///
    /// Returns the stroke to dispatch right away when nothing is in flight;
    /// otherwise the stroke waits and `None` is returned.
    pub fn push(&mut self, stroke: Stroke) -> Option<Dispatch> {
        if self.in_flight.is_some() {
            self.pending.push_back(stroke);
            debug!(pending = self.pending.len(), "stroke queued behind in-flight stroke");
            return None;
        }
        Some(self.release(stroke))
    }

    /// Records the host's outcome for the in-flight stroke and releases the
    /// next pending stroke, if any.
    ///
    /// A cancelled stroke is not retried.  An outcome whose ticket does not
    /// match the in-flight stroke is stale and ignored.
    pub fn finish(&mut self, ticket: DispatchTicket, outcome: StrokeOutcome) -> Option<Dispatch> {
        if self.in_flight != Some(ticket) {
            warn!(ticket, in_flight = ?self.in_flight, "ignoring stale stroke outcome");
            return None;
        }
        match outcome {
            StrokeOutcome::Completed => debug!(ticket, "stroke completed"),
            StrokeOutcome::Cancelled => debug!(ticket, "stroke cancelled by host"),
        }
        self.in_flight = None;
        let next = self.pending.pop_front()?;
        Some(self.release(next))
    }

    /// Whether a stroke is currently with the host.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of strokes waiting behind the in-flight one.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn release(&mut self, stroke: Stroke) -> Dispatch {
        let ticket = self.tickets.next();
        self.in_flight = Some(ticket);
        Dispatch { ticket, stroke }
    }
}
