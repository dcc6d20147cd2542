//! Linux X11 display session via Xlib and the XTest extension.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a process synthesize keyboard
//! and mouse events as if the user had physically interacted with the hardware.
//! These events are delivered to the currently focused window exactly like real
//! input.
//!
//! The calls used here:
//! - `XOpenDisplay(name)` / `XCloseDisplay(display)` — connection lifecycle.
//! - `XKeysymToKeycode(display, keysym)` — keymap lookup; returns 0 when no
//!   key produces the KeySym.
//! - `XTestFakeKeyEvent(display, keycode, is_press, delay)` — queue a key
//!   press or release.
//! - `XTestGrabControl(display, impervious)` — let injected events through
//!   even while another client holds a server grab.
//! - `XFlush(display)` — send every queued request to the server.
//!
//! # Lifecycle
//!
//! [`XDisplaySession`] owns the `Display` pointer.  It is opened once by
//! [`XDisplaySession::open`] and closed exactly once by `Drop`, so every exit
//! path of the program releases the connection.

use std::ffi::CString;
use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr::NonNull;

use tracing::{debug, info, warn};
use x11::{xlib, xtest};
use xfake_core::{Keycode, Keysym};

use crate::application::inject::{InjectError, KeyboardSession};

/// An open connection to an X display with the XTest extension available.
pub struct XDisplaySession {
    display: NonNull<xlib::Display>,
    name: String,
}

impl XDisplaySession {
    /// Opens the first display in `candidates` that accepts a connection and
    /// offers the XTEST extension.
    ///
    /// A display without XTEST is closed and the next candidate is tried.
    ///
    /// # Errors
    ///
    /// - [`InjectError::Platform`] if no candidate was usable and at least one
    ///   of them opened but lacked XTEST.
    /// - [`InjectError::NoDisplaySession`] if none of the candidates opens.
    pub fn open<N: AsRef<str>>(candidates: &[N]) -> Result<Self, InjectError> {
        first_usable(candidates, Self::connect)
    }

    fn connect(name: &str) -> Attempt<Self> {
        let Ok(c_name) = CString::new(name) else {
            warn!(display = name, "skipping display name with interior NUL");
            return Attempt::Unavailable;
        };

        // SAFETY: `c_name` is a valid NUL-terminated string that outlives
        // the call.  A non-null result must be freed by XCloseDisplay,
        // which `Drop` does.
        let raw = unsafe { xlib::XOpenDisplay(c_name.as_ptr()) };
        let Some(display) = NonNull::new(raw) else {
            return Attempt::Unavailable;
        };

        let session = Self {
            display,
            name: name.to_string(),
        };
        if session.has_xtest() {
            Attempt::Opened(session)
        } else {
            Attempt::MissingXTest
        }
    }

    /// The display name this session connected to.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn has_xtest(&self) -> bool {
        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        // SAFETY: `display` is a live connection; the out-pointers reference
        // locals that outlive the call.
        let present = unsafe {
            xtest::XTestQueryExtension(
                self.display.as_ptr(),
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if present == xlib::False {
            return false;
        }
        debug!(major, minor, "XTEST extension present");
        true
    }
}

/// Result of trying one display name.
enum Attempt<T> {
    /// Connected and usable.
    Opened(T),
    /// No server answered at this name.
    Unavailable,
    /// A server answered but cannot inject input; the connection is dropped.
    MissingXTest,
}

/// Walks `candidates` in order and returns the first one `connect` opens.
fn first_usable<N, T, F>(candidates: &[N], mut connect: F) -> Result<T, InjectError>
where
    N: AsRef<str>,
    F: FnMut(&str) -> Attempt<T>,
{
    let mut tried = Vec::with_capacity(candidates.len());
    let mut without_xtest = Vec::new();

    for candidate in candidates {
        let name = candidate.as_ref();
        tried.push(name.to_string());

        match connect(name) {
            Attempt::Opened(session) => {
                info!(display = name, "opened X display");
                return Ok(session);
            }
            Attempt::Unavailable => debug!(display = name, "display unavailable"),
            Attempt::MissingXTest => {
                warn!(display = name, "XTEST extension not available, trying next display");
                without_xtest.push(name.to_string());
            }
        }
    }

    if without_xtest.is_empty() {
        Err(InjectError::NoDisplaySession { tried })
    } else {
        Err(InjectError::Platform(format!(
            "XTEST extension not available on display {}",
            without_xtest.join(", ")
        )))
    }
}

impl KeyboardSession for XDisplaySession {
    fn keycode_for(&self, keysym: Keysym) -> Option<Keycode> {
        // SAFETY: `display` is a live connection; this is a read-only query
        // against the client-side copy of the keymap.
        let raw = unsafe {
            xlib::XKeysymToKeycode(self.display.as_ptr(), xlib::KeySym::from(keysym.raw()))
        };
        Keycode::new(raw)
    }

    fn key_event(
        &mut self,
        keycode: Keycode,
        pressed: bool,
        delay_ms: u64,
    ) -> Result<(), InjectError> {
        let is_press: c_int = if pressed { xlib::True } else { xlib::False };
        let delay = c_ulong::try_from(delay_ms).unwrap_or(c_ulong::MAX);

        // SAFETY: `display` is a live connection and XTest was verified at open.
        let status = unsafe {
            xtest::XTestFakeKeyEvent(
                self.display.as_ptr(),
                c_uint::from(keycode.raw()),
                is_press,
                delay,
            )
        };
        if status == 0 {
            return Err(InjectError::Platform(format!(
                "XTestFakeKeyEvent rejected {keycode} (pressed={pressed})"
            )));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), InjectError> {
        // SAFETY: `display` is a live connection.
        unsafe { xlib::XFlush(self.display.as_ptr()) };
        Ok(())
    }

    fn set_grab_control(&mut self, impervious: bool) -> Result<(), InjectError> {
        let flag: c_int = if impervious { xlib::True } else { xlib::False };
        // SAFETY: `display` is a live connection and XTest was verified at open.
        unsafe { xtest::XTestGrabControl(self.display.as_ptr(), flag) };
        Ok(())
    }
}

impl Drop for XDisplaySession {
    fn drop(&mut self) {
        // SAFETY: `display` was returned by XOpenDisplay and is not used after
        // this call.
        unsafe { xlib::XCloseDisplay(self.display.as_ptr()) };
        info!(display = %self.name, "closed X display");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
