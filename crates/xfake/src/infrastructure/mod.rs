//! Infrastructure layer: OS-facing adapters.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain` and
//! `xfake_core`, but MUST NOT be imported by the `application` or `domain`
//! layers.
//!
//! # Sub-modules
//!
//! - **`session`** – Implementations of `KeyboardSession`: the Xlib/XTest
//!   session on Linux, and an in-memory recorder for tests.

pub mod session;
