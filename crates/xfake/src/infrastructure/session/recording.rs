//! In-memory display session for tests.
//!
//! # Why a recording session?
//!
//! The real [`XDisplaySession`](super) needs a running X server and actually
//! types into whatever window has focus.  `RecordingSession` replaces every
//! server call with an entry in a shared [`SessionLog`], so tests can assert
//! on exactly which events were sent, in what order, and whether the session
//! was released.
//!
//! The log is shared through `Rc<RefCell<..>>` so it stays readable after the
//! session itself has been dropped.
//!
//! # Usage in tests
//!
//! ```ignore
//! let mut session = RecordingSession::us_keyboard();
//! let log = session.log();
//!
//! Injector::new(&mut session, &config)?.run(&b"Hi!\n"[..])?;
//! drop(session);
//!
//! assert!(log.borrow().released);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use xfake_core::{Keycode, Keysym};

use crate::application::inject::{InjectError, KeyboardSession};

/// One request observed by a [`RecordingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    KeyDown(Keycode),
    KeyUp(Keycode),
    Flush,
    GrabControl(bool),
}

/// Everything a [`RecordingSession`] has seen.
#[derive(Debug, Default)]
pub struct SessionLog {
    /// Requests in the order they were made.
    pub events: Vec<SessionEvent>,
    /// The delay passed with each key event, parallel to the key events in
    /// `events`.
    pub key_delays_ms: Vec<u64>,
    /// Set when the session is dropped.
    pub released: bool,
}

impl SessionLog {
    /// The events between consecutive flushes, flush excluded, dropping grab
    /// control requests.  A trailing group without a flush is kept.
    pub fn key_groups(&self) -> Vec<Vec<SessionEvent>> {
        let mut groups = Vec::new();
        let mut current = Vec::new();
        for event in &self.events {
            match event {
                SessionEvent::Flush => groups.push(std::mem::take(&mut current)),
                SessionEvent::GrabControl(_) => {}
                other => current.push(*other),
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }
        groups
    }
}

/// A [`KeyboardSession`] that records instead of injecting.
#[derive(Debug, Default)]
pub struct RecordingSession {
    keymap: HashMap<Keysym, Keycode>,
    log: Rc<RefCell<SessionLog>>,
    fail_key_event_at: Option<usize>,
    key_events: usize,
}

/// Key codes of the evdev keymap Xorg loads for a US pc105 keyboard.
const US_ROWS: [(&[u8], u8); 4] = [
    (b"1234567890", 10),
    (b"qwertyuiop", 24),
    (b"asdfghjkl", 38),
    (b"zxcvbnm", 52),
];

/// (KeySym, key code) pairs for the punctuation keys of the same keymap.
const US_PUNCTUATION_KEYS: [(u32, u8); 32] = [
    (0x0021, 10), // exclam
    (0x0040, 11), // at
    (0x0023, 12), // numbersign
    (0x0024, 13), // dollar
    (0x0025, 14), // percent
    (0x005E, 15), // asciicircum
    (0x0026, 16), // ampersand
    (0x002A, 17), // asterisk
    (0x0028, 18), // parenleft
    (0x0029, 19), // parenright
    (0x002D, 20), // minus
    (0x005F, 20), // underscore
    (0x003D, 21), // equal
    (0x002B, 21), // plus
    (0x005B, 34), // bracketleft
    (0x007B, 34), // braceleft
    (0x005D, 35), // bracketright
    (0x007D, 35), // braceright
    (0x003B, 47), // semicolon
    (0x003A, 47), // colon
    (0x0027, 48), // apostrophe
    (0x0022, 48), // quotedbl
    (0x0060, 49), // grave
    (0x007E, 49), // asciitilde
    (0x005C, 51), // backslash
    (0x007C, 51), // bar
    (0x002C, 59), // comma
    (0x002E, 60), // period
    (0x003E, 60), // greater
    (0x002F, 61), // slash
    (0x003F, 61), // question
    (0x003C, 94), // less (ISO 102nd key)
];

/// Key code of Shift_L in the same keymap.
pub const US_SHIFT_L: u8 = 50;

impl RecordingSession {
    /// Creates a session with an empty keymap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session whose keymap covers every supported character, with
    /// the key codes Xorg uses for a US keyboard.
    pub fn us_keyboard() -> Self {
        let mut session = Self::new().with_mapping(Keysym::SHIFT_L, US_SHIFT_L);
        for (row, first) in US_ROWS {
            for (offset, &byte) in (0u8..).zip(row) {
                let code = first + offset;
                session = session.with_mapping(Keysym::from_raw(u32::from(byte)), code);
                if byte.is_ascii_lowercase() {
                    let upper = byte.to_ascii_uppercase();
                    session = session.with_mapping(Keysym::from_raw(u32::from(upper)), code);
                }
            }
        }
        for (keysym, code) in US_PUNCTUATION_KEYS {
            session = session.with_mapping(Keysym::from_raw(keysym), code);
        }
        session
    }

    /// Maps `keysym` to the raw key code `raw`.  A `raw` of 0 removes the
    /// mapping.
    pub fn with_mapping(mut self, keysym: Keysym, raw: u8) -> Self {
        match Keycode::new(raw) {
            Some(code) => {
                self.keymap.insert(keysym, code);
            }
            None => {
                self.keymap.remove(&keysym);
            }
        }
        self
    }

    /// Removes `keysym` from the keymap.
    pub fn without_mapping(self, keysym: Keysym) -> Self {
        self.with_mapping(keysym, 0)
    }

    /// Makes the `n`-th key event (0-based) fail with a platform error.
    pub fn failing_key_event_at(mut self, n: usize) -> Self {
        self.fail_key_event_at = Some(n);
        self
    }

    /// A handle to the log that outlives the session.
    pub fn log(&self) -> Rc<RefCell<SessionLog>> {
        Rc::clone(&self.log)
    }
}

impl KeyboardSession for RecordingSession {
    fn keycode_for(&self, keysym: Keysym) -> Option<Keycode> {
        self.keymap.get(&keysym).copied()
    }

    fn key_event(
        &mut self,
        keycode: Keycode,
        pressed: bool,
        delay_ms: u64,
    ) -> Result<(), InjectError> {
        let n = self.key_events;
        self.key_events += 1;
        if self.fail_key_event_at == Some(n) {
            return Err(InjectError::Platform(format!("key event {n} failed")));
        }

        let mut log = self.log.borrow_mut();
        log.events.push(if pressed {
            SessionEvent::KeyDown(keycode)
        } else {
            SessionEvent::KeyUp(keycode)
        });
        log.key_delays_ms.push(delay_ms);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), InjectError> {
        self.log.borrow_mut().events.push(SessionEvent::Flush);
        Ok(())
    }

    fn set_grab_control(&mut self, impervious: bool) -> Result<(), InjectError> {
        self.log
            .borrow_mut()
            .events
            .push(SessionEvent::GrabControl(impervious));
        Ok(())
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.log.borrow_mut().released = true;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use xfake_core::resolve;

    #[test]
    fn test_us_keyboard_maps_every_supported_character() {
        let session = RecordingSession::us_keyboard();
        for byte in 0..=u8::MAX {
            if let Ok(stroke) = resolve(byte) {
                assert!(
                    session.keycode_for(stroke.keysym).is_some(),
                    "{:?} has no key code",
                    byte as char
                );
            }
        }
    }

    #[test]
    fn test_upper_and_lower_case_share_a_key() {
        let session = RecordingSession::us_keyboard();
        assert_eq!(
            session.keycode_for(Keysym::from_raw(0x48)),
            session.keycode_for(Keysym::from_raw(0x68))
        );
        assert_eq!(session.keycode_for(Keysym::from_raw(0x68)), Keycode::new(43));
    }

    #[test]
    fn test_without_mapping_removes_key() {
        let session = RecordingSession::us_keyboard().without_mapping(Keysym::SHIFT_L);
        assert_eq!(session.keycode_for(Keysym::SHIFT_L), None);
    }

    #[test]
    fn test_drop_marks_log_released() {
        let session = RecordingSession::new();
        let log = session.log();
        assert!(!log.borrow().released);

        drop(session);

        assert!(log.borrow().released);
    }

    #[test]
    fn test_key_groups_split_on_flush() {
        let a = Keycode::new(38).unwrap();
        let log = SessionLog {
            events: vec![
                SessionEvent::GrabControl(true),
                SessionEvent::KeyDown(a),
                SessionEvent::KeyUp(a),
                SessionEvent::Flush,
                SessionEvent::GrabControl(false),
                SessionEvent::KeyDown(a),
            ],
            ..Default::default()
        };
        assert_eq!(
            log.key_groups(),
            vec![
                vec![SessionEvent::KeyDown(a), SessionEvent::KeyUp(a)],
                vec![SessionEvent::KeyDown(a)],
            ]
        );
    }
}
