//! The session actor: one task that owns the whole engine.
//!
//! # Architecture
//!
//! ```text
//!  SessionHandle ──Event──►┐
//!  TimerService ──TimerFired──►  mpsc channel ──► InputSession::run
//!  stroke tasks ──StrokeFinished──►┘                 ├─ InputRouter (pointer, touch, timers)
//!                                                    └─ KeyEventInjector (keys)
//! ```
//!
//! Inbound events, timer expirations and stroke completions all arrive on
//! one channel and are handled one at a time by a single task.  That task is
//! the only writer of the pointer state, the press state and both queues, so
//! none of them needs a lock.
//!
//! Host stroke dispatch is asynchronous.  Each dispatch runs in its own
//! spawned task that awaits the host and posts the outcome back as
//! [`SessionCommand::StrokeFinished`]; the stroke queue advances only when
//! that message is handled.
//!
//! The actor keeps only a weak sender for itself, so the session ends when
//! the last [`SessionHandle`] is dropped or [`SessionHandle::shutdown`] is
//! called.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, WeakSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use touchbridge_core::{
    decode_event, protocol::DispatchTicket, GlobalAction, InboundEvent, KeyEventMessage,
    ProtocolError, Stroke, StrokeOutcome,
};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::{
    host::HostSurface,
    key_injector::KeyEventInjector,
    router::{InputEffects, InputRouter, TimerKind},
    stroke_queue::Dispatch,
    tuning::{GestureTuning, WheelTuning},
};
use crate::infrastructure::timer::{TimerService, TimerToken};

/// Capacity of the session command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// Errors returned by [`SessionHandle`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session task has stopped.
    #[error("session is closed")]
    Closed,

    /// An encoded inbound frame could not be decoded.
    #[error("inbound frame rejected: {0}")]
    Frame(#[from] ProtocolError),
}

/// Everything the session actor reacts to.
#[derive(Debug)]
pub enum SessionCommand {
    Event(InboundEvent),
    TimerFired {
        kind: TimerKind,
        token: TimerToken,
    },
    StrokeFinished {
        ticket: DispatchTicket,
        outcome: StrokeOutcome,
    },
    /// Resolves `done` once no gesture stroke is in flight or queued.
    Drain {
        done: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Per-session engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Multiplier applied to inbound pointer coordinates.
    pub display_scale: i32,
    pub gesture: GestureTuning,
    pub wheel: WheelTuning,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            display_scale: 1,
            gesture: GestureTuning::default(),
            wheel: WheelTuning::default(),
        }
    }
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// Cloneable sender side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queues one inbound event.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn submit(&self, event: InboundEvent) -> Result<(), SessionError> {
        self.send(SessionCommand::Event(event)).await
    }

    /// Decodes one encoded frame from the front of `bytes` and queues it.
    /// Returns the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Frame`] for a malformed frame (nothing is
    /// queued) or [`SessionError::Closed`] if the session has stopped.
    pub async fn submit_frame(&self, bytes: &[u8]) -> Result<usize, SessionError> {
        let (event, consumed) = decode_event(bytes)?;
        self.submit(event).await?;
        Ok(consumed)
    }

    pub async fn pointer(&self, mask: i32, x: i32, y: i32) -> Result<(), SessionError> {
        self.submit(InboundEvent::Pointer { mask, x, y }).await
    }

    pub async fn touch(&self, mask: i32, x: i32, y: i32) -> Result<(), SessionError> {
        self.submit(InboundEvent::Touch { mask, x, y }).await
    }

    pub async fn key(&self, event: KeyEventMessage) -> Result<(), SessionError> {
        self.submit(InboundEvent::Key(event)).await
    }

    /// Waits until every gesture stroke queued so far has been played.
    ///
    /// Scroll swipes are not tracked and may still be running.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session stops first.
    pub async fn drain(&self) -> Result<(), SessionError> {
        let (done, idle) = oneshot::channel();
        self.send(SessionCommand::Drain { done }).await?;
        idle.await.map_err(|_| SessionError::Closed)
    }

    /// Asks the session to stop after the commands already queued.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has already stopped.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

/// The session actor.  Created and started by [`InputSession::spawn`].
pub struct InputSession {
    id: Uuid,
    host: Arc<dyn HostSurface>,
    router: InputRouter,
    injector: KeyEventInjector,
    timers: TimerService,
    commands: WeakSender<SessionCommand>,
    drain_waiters: Vec<oneshot::Sender<()>>,
}

impl InputSession {
    /// Starts a session against `host` on the current tokio runtime.
    ///
    /// Returns the handle for submitting events and the actor's task, which
    /// completes once the session has shut down.
    pub fn spawn(
        host: Arc<dyn HostSurface>,
        settings: SessionSettings,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let id = Uuid::new_v4();
        let weak = tx.downgrade();

        let session = InputSession {
            id,
            host,
            router: InputRouter::new(settings.display_scale, settings.gesture, settings.wheel),
            injector: KeyEventInjector::new(),
            timers: TimerService::new(weak.clone()),
            commands: weak,
            drain_waiters: Vec::new(),
        };
        let task = tokio::spawn(session.run(rx).instrument(info_span!("session", id = %id)));

        (SessionHandle { id, commands: tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        info!("session started");

        while let Some(command) = rx.recv().await {
            match command {
                SessionCommand::Event(event) => self.on_event(event),
                SessionCommand::TimerFired { kind, token } => {
                    if self.timers.accept(kind, token) {
                        let mut fx =
                            SessionEffects::new(&self.host, &mut self.timers, &self.commands);
                        self.router.on_timer(kind, &mut fx);
                    }
                }
                SessionCommand::StrokeFinished { ticket, outcome } => {
                    let mut fx = SessionEffects::new(&self.host, &mut self.timers, &self.commands);
                    self.router.on_stroke_finished(ticket, outcome, &mut fx);
                }
                SessionCommand::Drain { done } => self.drain_waiters.push(done),
                SessionCommand::Shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }
            self.release_drain_waiters();
        }

        self.timers.cancel_all();
        info!("session stopped");
    }

    fn release_drain_waiters(&mut self) {
        if self.drain_waiters.is_empty() || self.router.engine().queue().is_busy() {
            return;
        }
        debug!(waiters = self.drain_waiters.len(), "stroke queue drained");
        for done in self.drain_waiters.drain(..) {
            let _ = done.send(());
        }
    }

    fn on_event(&mut self, event: InboundEvent) {
        let now = Instant::now();
        match event {
            InboundEvent::Pointer { mask, x, y } => {
                let mut fx = SessionEffects::new(&self.host, &mut self.timers, &self.commands);
                self.router.on_pointer_event(mask, x, y, now, &mut fx);
            }
            InboundEvent::Touch { mask, x, y } => {
                let mut fx = SessionEffects::new(&self.host, &mut self.timers, &self.commands);
                self.router.on_touch_event(mask, x, y, now, &mut fx);
            }
            InboundEvent::Key(key) => match self.injector.inject(self.host.as_ref(), &key) {
                Ok(injection) => debug!(?injection, "key injected"),
                Err(e) => warn!("key event had no effect: {e}"),
            },
        }
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// Carries out the router's requests on the host and the timer service.
struct SessionEffects<'a> {
    host: &'a Arc<dyn HostSurface>,
    timers: &'a mut TimerService,
    commands: &'a WeakSender<SessionCommand>,
}

impl<'a> SessionEffects<'a> {
    fn new(
        host: &'a Arc<dyn HostSurface>,
        timers: &'a mut TimerService,
        commands: &'a WeakSender<SessionCommand>,
    ) -> Self {
        Self {
            host,
            timers,
            commands,
        }
    }
}

impl InputEffects for SessionEffects<'_> {
    fn dispatch_stroke(&mut self, dispatch: Dispatch) {
        let host = Arc::clone(self.host);
        let commands = self.commands.clone();
        let Dispatch { ticket, stroke } = dispatch;
        debug!(ticket, "dispatching stroke");
        tokio::spawn(
            async move {
                let outcome = host.dispatch_stroke(stroke).await;
                if let Some(tx) = commands.upgrade() {
                    let _ = tx
                        .send(SessionCommand::StrokeFinished { ticket, outcome })
                        .await;
                }
            }
            .in_current_span(),
        );
    }

    fn dispatch_wheel(&mut self, stroke: Stroke) {
        let host = Arc::clone(self.host);
        tokio::spawn(
            async move {
                let outcome = host.dispatch_stroke(stroke).await;
                debug!(?outcome, "scroll swipe finished");
            }
            .in_current_span(),
        );
    }

    fn perform_global_action(&mut self, action: GlobalAction) {
        if !self.host.perform_global_action(action) {
            warn!(?action, "host refused global action");
        }
    }

    fn schedule_timer(&mut self, kind: TimerKind, delay: Duration) {
        self.timers.schedule(kind, delay);
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        self.timers.cancel(kind);
    }
}
