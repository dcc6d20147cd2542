//! xfake library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does xfake do? (for beginners)
//!
//! xfake types text for you.  It reads characters from standard input and,
//! for each one, makes the X server believe a real keyboard pressed and
//! released the matching key:
//!
//! 1. Opens the X display `:0`, falling back to `:1`.
//! 2. Looks up the key code of the left Shift key once.
//! 3. For every input byte up to the first newline: resolves the KeySym with
//!    `xfake_core::resolve`, looks its key code up in the server's keymap, and
//!    sends Shift↓ key↓ key↑ Shift↑ (Shift only when needed) via XTest.
//! 4. Flushes after every character so events arrive in order.
//! 5. Closes the display.

/// Domain layer: configuration.
pub mod domain;

/// Application layer: the injection loop.
pub mod application;

/// Infrastructure layer: display session adapters.
pub mod infrastructure;
