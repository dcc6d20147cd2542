//! Character → KeySym translation for the US keyboard layout.
//!
//! - [`keysym`] defines the [`Keysym`] and [`Keycode`] value types.
//! - [`us_layout`] holds the static punctuation table and [`resolve`], the
//!   pure function that maps one input byte to a [`KeyStroke`].

pub mod keysym;
pub mod us_layout;

pub use keysym::{Keycode, Keysym};
pub use us_layout::{resolve, KeyStroke, ResolveError};
