//! Character → KeySym resolution for a US keyboard layout.
//!
//! # How a character becomes a key (for beginners)
//!
//! On a US keyboard every printable ASCII character lives on some key, and
//! roughly half of them need Shift held down: `1` and `!` share a key, as do
//! `;` and `:`.  X11 does not tell you which characters need Shift, so the
//! decision is encoded here as a static table.
//!
//! - Letters and digits map to the KeySym with the same glyph.  Uppercase
//!   letters need Shift.
//! - The 32 punctuation characters are listed in [`US_PUNCTUATION`], each with
//!   its own Shift flag.
//! - Everything else (space, control bytes, bytes >= 0x80) is unsupported.
//!
//! # The `<` entry
//!
//! `<` is Shift+comma on a US keyboard, yet its table entry carries no Shift
//! flag.  Servers whose keymap has a dedicated `XK_less` key (the ISO 102nd
//! key) still type `<`; on a pure US keymap this yields `,`.  The entry is kept
//! as is.

use thiserror::Error;

use super::keysym::Keysym;

/// Error returned when a byte has no key on the supported layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The byte is neither ASCII alphanumeric nor in [`US_PUNCTUATION`].
    #[error("no keysym for character {}", describe_byte(*.0))]
    UnsupportedCharacter(u8),
}

/// The outcome of resolving one character: which key, and whether Shift must
/// be held while it is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    /// The logical key to press.
    pub keysym: Keysym,
    /// `true` when Shift must be held around the key press/release pair.
    pub shift: bool,
}

/// One row of the punctuation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunctuationKey {
    /// The ASCII character.
    pub byte: u8,
    /// The KeySym that produces it.
    pub keysym: Keysym,
    /// The keysymdef.h name of `keysym`, without the `XK_` prefix.
    pub name: &'static str,
    /// Whether Shift is held for this character.
    pub shift: bool,
}

const fn punct(byte: u8, keysym: u32, name: &'static str, shift: bool) -> PunctuationKey {
    PunctuationKey {
        byte,
        keysym: Keysym::from_raw(keysym),
        name,
        shift,
    }
}

/// Every punctuation character the resolver supports, in US keyboard order.
pub const US_PUNCTUATION: [PunctuationKey; 32] = [
    punct(b'`', 0x0060, "grave", false),
    punct(b'~', 0x007E, "asciitilde", true),
    punct(b'!', 0x0021, "exclam", true),
    punct(b'@', 0x0040, "at", true),
    punct(b'#', 0x0023, "numbersign", true),
    punct(b'$', 0x0024, "dollar", true),
    punct(b'%', 0x0025, "percent", true),
    punct(b'^', 0x005E, "asciicircum", true),
    punct(b'&', 0x0026, "ampersand", true),
    punct(b'*', 0x002A, "asterisk", true),
    punct(b'(', 0x0028, "parenleft", true),
    punct(b')', 0x0029, "parenright", true),
    punct(b'-', 0x002D, "minus", false),
    punct(b'_', 0x005F, "underscore", true),
    punct(b'=', 0x003D, "equal", false),
    punct(b'+', 0x002B, "plus", true),
    punct(b'[', 0x005B, "bracketleft", false),
    punct(b'{', 0x007B, "braceleft", true),
    punct(b']', 0x005D, "bracketright", false),
    punct(b'}', 0x007D, "braceright", true),
    punct(b'\\', 0x005C, "backslash", false),
    punct(b'|', 0x007C, "bar", true),
    punct(b';', 0x003B, "semicolon", false),
    punct(b':', 0x003A, "colon", true),
    punct(b'\'', 0x0027, "apostrophe", false),
    punct(b'"', 0x0022, "quotedbl", true),
    punct(b',', 0x002C, "comma", false),
    punct(b'<', 0x003C, "less", false),
    punct(b'.', 0x002E, "period", false),
    punct(b'>', 0x003E, "greater", true),
    punct(b'/', 0x002F, "slash", false),
    punct(b'?', 0x003F, "question", true),
];

/// Resolves one input byte to the key that types it.
///
/// This is a pure lookup: the same byte always yields the same result.
///
/// # Errors
///
/// Returns [`ResolveError::UnsupportedCharacter`] for any byte that is not
/// ASCII alphanumeric and not in [`US_PUNCTUATION`].
///
/// # Examples
///
/// ```rust
/// use xfake_core::{resolve, Keysym};
///
/// let stroke = resolve(b'H').unwrap();
/// assert_eq!(stroke.keysym, Keysym::from_raw(0x48)); // XK_H
/// assert!(stroke.shift);
/// ```
pub fn resolve(byte: u8) -> Result<KeyStroke, ResolveError> {
    if byte.is_ascii_alphanumeric() {
        // Latin-1 KeySyms equal the character's code point.
        return Ok(KeyStroke {
            keysym: Keysym::from_raw(u32::from(byte)),
            shift: byte.is_ascii_uppercase(),
        });
    }

    US_PUNCTUATION
        .iter()
        .find(|entry| entry.byte == byte)
        .map(|entry| KeyStroke {
            keysym: entry.keysym,
            shift: entry.shift,
        })
        .ok_or(ResolveError::UnsupportedCharacter(byte))
}

/// Renders a byte for diagnostics: printable ASCII as `'c'`, the rest as hex.
fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("0x{byte:02X}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
