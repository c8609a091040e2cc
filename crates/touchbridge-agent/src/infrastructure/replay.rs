//! Event-script replay.
//!
//! A script is JSON lines, one entry per line:
//!
//! ```text
//! # drag from (100, 100) to (140, 100)
//! {"after_ms": 0,  "event": {"pointer": {"mask": 9,  "x": 100, "y": 100}}}
//! {"after_ms": 16, "event": {"pointer": {"mask": 8,  "x": 120, "y": 100}}}
//! {"after_ms": 16, "event": {"pointer": {"mask": 10, "x": 140, "y": 100}}}
//! ```
//!
//! `after_ms` is the pause before the entry's event is submitted, relative to
//! the previous entry.  Blank lines and lines starting with `#` are skipped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touchbridge_core::InboundEvent;
use tracing::{debug, info};

use super::session::{SessionError, SessionHandle};

/// Errors raised while parsing or replaying a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("script line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("session rejected event: {0}")]
    Session(#[from] SessionError),
}

/// One scripted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Pause before this event, in milliseconds.
    #[serde(default)]
    pub after_ms: u64,
    pub event: InboundEvent,
}

/// Parses a JSON-lines script.
///
/// # Errors
///
/// Returns [`ReplayError::Parse`] with the 1-based line number of the first
/// line that is not a valid entry.
pub fn parse_script(source: &str) -> Result<Vec<ScriptEntry>, ReplayError> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| ReplayError::Parse { line, source })
        })
        .collect()
}

/// Submits every entry to the session, honouring the pauses.
///
/// Returns once the last event has been queued; it does not wait for the
/// session to finish playing the resulting strokes.
///
/// # Errors
///
/// Returns [`ReplayError::Session`] if the session stops mid-script.
pub async fn replay(session: &SessionHandle, entries: &[ScriptEntry]) -> Result<(), ReplayError> {
    info!(entries = entries.len(), "replaying script");
    for (i, entry) in entries.iter().enumerate() {
        if entry.after_ms > 0 {
            tokio::time::sleep(Duration::from_millis(entry.after_ms)).await;
        }
        debug!(index = i, event = ?entry.event, "submitting");
        session.submit(entry.event.clone()).await?;
    }
    Ok(())
}
