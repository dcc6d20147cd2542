//! X11 KeySym and KeyCode value types.
//!
//! KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # KeySym vs. KeyCode (for beginners)
//!
//! | Concept   | Example            | Who decides the value?            |
//! |-----------|--------------------|-----------------------------------|
//! | KeySym    | `XK_exclam` = 0x21 | The X11 protocol (fixed forever)  |
//! | KeyCode   | 10                 | The keymap loaded by the X server |
//!
//! For the Latin-1 range the KeySym value is simply the character's code
//! point: `XK_A` is 0x41, `XK_exclam` is 0x21.  That is why the resolver can
//! carry numeric values directly instead of looking names up at runtime.

use std::fmt;

use super::us_layout::US_PUNCTUATION;

/// An X11 KeySym: a layout-independent identifier for a logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keysym(u32);

impl Keysym {
    /// `XK_Shift_L`, the left Shift modifier.
    pub const SHIFT_L: Keysym = Keysym(0xFFE1);

    /// `XK_Shift_R`, the right Shift modifier.
    pub const SHIFT_R: Keysym = Keysym(0xFFE2);

    /// Wraps a raw KeySym value.
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw KeySym value as sent to the X server.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the keysymdef.h name (without the `XK_` prefix) for the keys
    /// this crate knows about.
    ///
    /// Letters and digits are named by their glyph, so `XK_a` returns `"a"`.
    /// Returns `None` for any KeySym outside the supported set.
    pub fn name(self) -> Option<&'static str> {
        const ALNUM: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

        match self {
            Self::SHIFT_L => return Some("Shift_L"),
            Self::SHIFT_R => return Some("Shift_R"),
            _ => {}
        }

        if let Ok(byte) = u8::try_from(self.0) {
            if byte.is_ascii_alphanumeric() {
                let idx = ALNUM.find(byte as char)?;
                return Some(&ALNUM[idx..idx + 1]);
            }
        }

        US_PUNCTUATION
            .iter()
            .find(|entry| entry.keysym == self)
            .map(|entry| entry.name)
    }
}

impl fmt::Display for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "XK_{name}"),
            None => write!(f, "0x{:04X}", self.0),
        }
    }
}

/// A physical key code in the display server's current keymap.
///
/// X11 key codes are 8-bit and the protocol reserves 0 as "no key", so a
/// `Keycode` is only ever built from a non-zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keycode(u8);

impl Keycode {
    /// Wraps a raw key code, returning `None` for the reserved value 0.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Returns the raw key code.
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keycode {}", self.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
