//! Infrastructure layer for the agent.
//!
//! Contains the runtime around the application layer: the session actor,
//! timers, configuration, script replay, and a recording host.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchbridge_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`session`** – the actor task that owns the input router and the key
//!   injector and serializes events, timer expirations and stroke completions.
//!
//! - **`timer`** – one-shot tokio timers that post their expiration back into
//!   the session channel.
//!
//! - **`config`** – `AgentConfig` loaded from a TOML file, with a default for
//!   every field.
//!
//! - **`replay`** – JSON-lines event scripts fed into a session.
//!
//! - **`host`** – `MockHost` and `MockNode`, a host that records every request.
//!   Used by the tests and by the replay binary.

pub mod config;
pub mod host;
pub mod replay;
pub mod session;
pub mod timer;
