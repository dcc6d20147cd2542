//! Injector: turns a byte stream into ordered key events on a display session.
//!
//! This use case sits at the application layer and drives a
//! [`KeyboardSession`] implementation for keymap lookups and event injection.
//! The platform-specific implementation lives in the infrastructure layer.
//!
//! # Event sequence per character (for beginners)
//!
//! Typing `H` on a real keyboard means holding Shift, pressing and releasing
//! the `h` key, then letting go of Shift.  The injector reproduces exactly
//! that, then flushes so the server has every event before the next character
//! starts:
//!
//! ```text
//! [grab on] Shift↓  h↓  h↑  Shift↑  flush [grab off]
//! ```
//!
//! Characters that need no modifier skip the Shift events.  Every key event
//! carries the configured nonzero delay; together with the flush after each
//! character this keeps the server from reordering rapid input.
//!
//! # Stopping
//!
//! | Input                   | Result                                    |
//! |-------------------------|-------------------------------------------|
//! | `\n`                    | stop, newline consumed but not typed      |
//! | end of input            | stop                                      |
//! | read error              | stop (not an error)                       |
//! | unsupported character   | [`InjectError::UnsupportedCharacter`]     |
//! | keysym missing from map | [`InjectError::NoPhysicalMapping`]        |

use std::io::Read;

use thiserror::Error;
use tracing::{debug, warn};
use xfake_core::{resolve, Keycode, Keysym, ResolveError};

use crate::domain::{ConfigError, InjectorConfig};

/// Error type for everything that can abort a run.
#[derive(Debug, Error)]
pub enum InjectError {
    /// None of the configured displays could be opened.
    #[error("failed to open display (tried {})", .tried.join(", "))]
    NoDisplaySession { tried: Vec<String> },

    /// The modifier keysym has no key in the server's keymap.
    #[error("no keycode for modifier {keysym}")]
    NoShiftMapping { keysym: Keysym },

    /// The input byte has no key on the supported layout.
    #[error(transparent)]
    UnsupportedCharacter(#[from] ResolveError),

    /// The keysym resolved for an input byte has no key in the server's keymap.
    #[error("no keycode for {keysym} in the current keymap")]
    NoPhysicalMapping { keysym: Keysym },

    /// The configuration violates an invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The display server rejected a request.
    #[error("platform error: {0}")]
    Platform(String),
}

/// The seam between the injector and a display server.
///
/// Real sessions talk to X11; tests use an in-memory recorder.
pub trait KeyboardSession {
    /// Looks `keysym` up in the session's current keymap.
    ///
    /// Returns `None` if no key produces it.
    fn keycode_for(&self, keysym: Keysym) -> Option<Keycode>;

    /// Queues a key press (`pressed = true`) or release, to be processed
    /// `delay_ms` milliseconds after the previous event.
    fn key_event(
        &mut self,
        keycode: Keycode,
        pressed: bool,
        delay_ms: u64,
    ) -> Result<(), InjectError>;

    /// Sends every queued request to the server.
    fn flush(&mut self) -> Result<(), InjectError>;

    /// Makes injected events impervious to server grabs (`true`) or restores
    /// normal grab handling (`false`).
    fn set_grab_control(&mut self, impervious: bool) -> Result<(), InjectError>;
}

/// Why [`Injector::run`] stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A newline was read.
    Newline,
    /// The input was exhausted.
    EndOfInput,
    /// Reading the input failed.
    ReadError,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of characters typed.
    pub typed: usize,
    /// What ended the run.
    pub stop: StopReason,
}

/// Holds the modifier key down for as long as it lives.
///
/// [`ModifierHold::release`] lets go of the modifier and reports any error.
/// If the hold is dropped without being released, for example because a key
/// event failed in between, the release is still sent and a failure is only
/// logged.
struct ModifierHold<'a, S: KeyboardSession + ?Sized> {
    session: &'a mut S,
    keycode: Keycode,
    delay_ms: u64,
    held: bool,
}

impl<'a, S: KeyboardSession + ?Sized> ModifierHold<'a, S> {
    fn press(session: &'a mut S, keycode: Keycode, delay_ms: u64) -> Result<Self, InjectError> {
        session.key_event(keycode, true, delay_ms)?;
        Ok(Self {
            session,
            keycode,
            delay_ms,
            held: true,
        })
    }

    fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    fn release(mut self) -> Result<(), InjectError> {
        self.held = false;
        self.session.key_event(self.keycode, false, self.delay_ms)
    }
}

impl<S: KeyboardSession + ?Sized> Drop for ModifierHold<'_, S> {
    fn drop(&mut self) {
        if self.held {
            if let Err(err) = self.session.key_event(self.keycode, false, self.delay_ms) {
                warn!(keycode = self.keycode.raw(), "failed to release modifier: {err}");
            }
        }
    }
}

/// Presses and releases `keycode`.
fn tap<S: KeyboardSession + ?Sized>(
    session: &mut S,
    keycode: Keycode,
    delay_ms: u64,
) -> Result<(), InjectError> {
    session.key_event(keycode, true, delay_ms)?;
    session.key_event(keycode, false, delay_ms)
}

/// The injection loop.
///
/// Borrows the session for its whole lifetime so that the owner can report a
/// failure while the session is still open and close it afterwards.
pub struct Injector<'s, S: KeyboardSession + ?Sized> {
    session: &'s mut S,
    modifier: Keycode,
    delay_ms: u64,
    grab_control: bool,
}

impl<'s, S: KeyboardSession + ?Sized> Injector<'s, S> {
    /// Validates `config` and resolves the modifier key code once.
    ///
    /// # Errors
    ///
    /// - [`InjectError::InvalidConfig`] if `config` fails validation.
    /// - [`InjectError::NoShiftMapping`] if the modifier has no key code.
    pub fn new(session: &'s mut S, config: &InjectorConfig) -> Result<Self, InjectError> {
        config.validate()?;
        let modifier = session
            .keycode_for(config.modifier)
            .ok_or(InjectError::NoShiftMapping {
                keysym: config.modifier,
            })?;
        debug!(keysym = %config.modifier, keycode = modifier.raw(), "resolved modifier");

        Ok(Self {
            session,
            modifier,
            delay_ms: config.key_event_delay_ms(),
            grab_control: config.grab_control,
        })
    }

    /// The key code used for Shift.
    pub fn modifier(&self) -> Keycode {
        self.modifier
    }

    /// Types one character and flushes.
    ///
    /// Both lookups happen before any event is sent, so an unsupported or
    /// unmapped character leaves the server untouched.
    ///
    /// # Errors
    ///
    /// - [`InjectError::UnsupportedCharacter`] if `byte` has no key.
    /// - [`InjectError::NoPhysicalMapping`] if its keysym is not in the keymap.
    /// - Any error the session returns while sending events.
    pub fn type_byte(&mut self, byte: u8) -> Result<(), InjectError> {
        let stroke = resolve(byte)?;
        let keycode =
            self.session
                .keycode_for(stroke.keysym)
                .ok_or(InjectError::NoPhysicalMapping {
                    keysym: stroke.keysym,
                })?;
        debug!(
            byte,
            keysym = %stroke.keysym,
            keycode = keycode.raw(),
            shift = stroke.shift,
            "typing character"
        );

        if self.grab_control {
            self.session.set_grab_control(true)?;
        }
        let sent = self
            .emit(keycode, stroke.shift)
            .and_then(|()| self.session.flush());
        let ungrabbed = if self.grab_control {
            self.session.set_grab_control(false)
        } else {
            Ok(())
        };
        sent.and(ungrabbed)
    }

    fn emit(&mut self, keycode: Keycode, shift: bool) -> Result<(), InjectError> {
        if shift {
            let mut hold = ModifierHold::press(&mut *self.session, self.modifier, self.delay_ms)?;
            tap(hold.session(), keycode, self.delay_ms)?;
            hold.release()
        } else {
            tap(&mut *self.session, keycode, self.delay_ms)
        }
    }

    /// Types bytes from `input` until a newline, end of input, or read error.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Injector::type_byte`]; no further input
    /// is read after it.
    pub fn run<R: Read>(&mut self, input: R) -> Result<RunOutcome, InjectError> {
        let mut typed = 0;

        for next in input.bytes() {
            let byte = match next {
                Ok(b'\n') => return Ok(RunOutcome { typed, stop: StopReason::Newline }),
                Ok(byte) => byte,
                Err(err) => {
                    debug!("stopping on read error: {err}");
                    return Ok(RunOutcome { typed, stop: StopReason::ReadError });
                }
            };
            self.type_byte(byte)?;
            typed += 1;
        }

        Ok(RunOutcome {
            typed,
            stop: StopReason::EndOfInput,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
