//! One-shot timers that report back into the session channel.
//!
//! Each armed timer is a tokio task that sleeps and then posts
//! [`SessionCommand::TimerFired`] to the session.  Because the expiration
//! travels through the same channel as inbound events, timer handling never
//! runs concurrently with event handling.
//!
//! # Tokens (for beginners)
//!
//! Aborting a task does not recall a message it already sent.  A timer that
//! expires at the same moment it is cancelled can still land in the channel.
//! Every arming therefore gets a fresh token, and [`TimerService::accept`]
//! only lets through an expiration whose token matches the timer that is
//! currently armed.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::WeakSender;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};

use crate::application::router::TimerKind;
use crate::infrastructure::session::SessionCommand;

/// Identifies one arming of a timer.
pub type TimerToken = u64;

struct Armed {
    token: TimerToken,
    task: JoinHandle<()>,
}

/// Arms, replaces and cancels the session's timers.
pub struct TimerService {
    commands: WeakSender<SessionCommand>,
    armed: HashMap<TimerKind, Armed>,
    next_token: TimerToken,
}

impl TimerService {
    pub fn new(commands: WeakSender<SessionCommand>) -> Self {
        Self {
            commands,
            armed: HashMap::new(),
            next_token: 0,
        }
    }

    /// Arms `kind` to fire after `delay`, replacing a pending timer of the
    /// same kind.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        self.cancel(kind);
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);

        let commands = self.commands.clone();
        let task = tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                debug!(?kind, token, "timer fired");
                if let Some(tx) = commands.upgrade() {
                    let _ = tx.send(SessionCommand::TimerFired { kind, token }).await;
                }
            }
            .in_current_span(),
        );
        debug!(?kind, ?delay, token, "timer armed");
        self.armed.insert(kind, Armed { token, task });
    }

    /// Disarms `kind`.  Does nothing if it is not armed.
    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(armed) = self.armed.remove(&kind) {
            armed.task.abort();
            debug!(?kind, token = armed.token, "timer cancelled");
        }
    }

    /// Checks an expiration against the armed timer.  Returns `true` and
    /// disarms the timer if the expiration is current; stale expirations
    /// return `false`.
    pub fn accept(&mut self, kind: TimerKind, token: TimerToken) -> bool {
        match self.armed.get(&kind) {
            Some(armed) if armed.token == token => {
                self.armed.remove(&kind);
                true
            }
            _ => {
                debug!(?kind, token, "stale timer expiration ignored");
                false
            }
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    /// Disarms every timer.
    pub fn cancel_all(&mut self) {
        for (_, armed) in self.armed.drain() {
            armed.task.abort();
        }
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
