//! # xfake-core
//!
//! Pure character-to-key resolution for xfake.
//!
//! This crate has zero dependencies on OS APIs or display servers.  It answers
//! one question: *which X11 key, with or without Shift, produces this
//! character on a US keyboard?*  Turning that answer into a physical key code
//! needs the live keymap of a display session and lives in the `xfake` crate.
//!
//! # Architecture overview (for beginners)
//!
//! Typing a character through X11 is a three-step translation:
//!
//! ```text
//! byte from stdin ──resolve()──▶ KeySym (+ shift flag) ──server keymap──▶ KeyCode
//! ```
//!
//! - A **KeySym** is a layout-independent name for a key, such as `XK_exclam`
//!   (`!`) or `XK_a`.  KeySym values are fixed by the X11 protocol.
//! - A **KeyCode** is the number of a physical key on the keyboard the server
//!   currently has loaded.  It changes with the keyboard layout, so it can only
//!   be looked up by asking the server.
//!
//! The first step is entirely static and lives here, in [`keymap`].

pub mod keymap;

pub use keymap::keysym::{Keycode, Keysym};
pub use keymap::us_layout::{resolve, KeyStroke, ResolveError};
