//! Display session implementations.
//!
//! The X11 implementation is selected at compile time via
//! `#[cfg(target_os = "linux")]`.

pub mod recording;

#[cfg(target_os = "linux")]
pub mod xorg;
