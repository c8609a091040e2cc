//! Thread-safe counter for stroke dispatch tickets.
//!
//! # What is a dispatch ticket? (for beginners)
//!
//! Every stroke handed to the host is tagged with a monotonically increasing
//! integer called a *ticket*.  The host reports completion asynchronously, so
//! by the time a completion arrives the session may have been reset and a new
//! stroke dispatched.  Comparing the ticket on the completion against the
//! ticket of the stroke currently in flight tells the stroke queue whether
//! the completion is current or stale.
//!
//! # Thread safety
//!
//! The counter uses `AtomicU64` internally, so it can be read through a shared
//! reference and moved between tasks without a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one dispatched stroke.
pub type DispatchTicket = u64;

/// A thread-safe, monotonically increasing ticket source.
///
/// Tickets start at 0 and increment by 1 with each call to [`TicketCounter::next`].
/// The counter wraps around at `u64::MAX` back to 0 without panicking.
///
/// # Examples
///
/// ```rust
/// use touchbridge_core::protocol::TicketCounter;
///
/// let counter = TicketCounter::new();
/// assert_eq!(counter.next(), 0);
/// assert_eq!(counter.next(), 1);
/// ```
pub struct TicketCounter {
    inner: AtomicU64,
}

impl TicketCounter {
    /// Creates a new counter starting at 0.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(0),
        }
    }

    /// Returns the next ticket and atomically increments the counter.
    ///
    /// `Ordering::Relaxed` is sufficient: tickets are compared for equality,
    /// never used to publish other memory.
    pub fn next(&self) -> DispatchTicket {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the next ticket that will be issued, without incrementing.
    pub fn current(&self) -> DispatchTicket {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for TicketCounter {
    fn default() -> Self {
        Self::new()
    }
}
