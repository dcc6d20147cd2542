//! Application layer use cases.
//!
//! - **`inject`** – Reads characters, resolves each one to a key, and drives a
//!   `KeyboardSession` through the press/release/flush sequence.  The session
//!   is injected at construction time so the loop can be tested without an X
//!   server.

pub mod inject;

pub use inject::{InjectError, Injector, KeyboardSession, RunOutcome, StopReason};
