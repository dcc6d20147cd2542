//! Integration tests for the injection loop.
//!
//! These drive `Injector` end to end against `RecordingSession` and check the
//! exact event stream, one group per flushed character.

use std::time::Duration;

use xfake::application::{InjectError, Injector, RunOutcome, StopReason};
use xfake::domain::InjectorConfig;
use xfake::infrastructure::session::recording::{RecordingSession, SessionEvent, US_SHIFT_L};
use xfake_core::{Keycode, Keysym, ResolveError};

fn kc(raw: u8) -> Keycode {
    Keycode::new(raw).expect("test key codes are nonzero")
}

fn down(raw: u8) -> SessionEvent {
    SessionEvent::KeyDown(kc(raw))
}

fn up(raw: u8) -> SessionEvent {
    SessionEvent::KeyUp(kc(raw))
}

// Key codes from RecordingSession::us_keyboard().
const KEY_H: u8 = 43;
const KEY_I: u8 = 31;
const KEY_1: u8 = 10;
const KEY_3: u8 = 12;

#[test]
fn test_hi_bang_produces_shifted_and_plain_groups() {
    // Arrange
    let mut session = RecordingSession::us_keyboard();
    let log = session.log();
    let config = InjectorConfig::default();

    // Act
    let outcome = Injector::new(&mut session, &config)
        .unwrap()
        .run(&b"Hi!\n"[..])
        .unwrap();

    // Assert
    assert_eq!(outcome, RunOutcome { typed: 3, stop: StopReason::Newline });
    assert_eq!(
        log.borrow().key_groups(),
        vec![
            vec![down(US_SHIFT_L), down(KEY_H), up(KEY_H), up(US_SHIFT_L)],
            vec![down(KEY_I), up(KEY_I)],
            vec![down(US_SHIFT_L), down(KEY_1), up(KEY_1), up(US_SHIFT_L)],
        ]
    );
}

#[test]
fn test_numbersign_is_shift_wrapped() {
    let mut session = RecordingSession::us_keyboard();
    let log = session.log();

    let outcome = Injector::new(&mut session, &InjectorConfig::default())
        .unwrap()
        .run(&b"#\n"[..])
        .unwrap();

    assert_eq!(outcome.stop, StopReason::Newline);
    assert_eq!(
        log.borrow().key_groups(),
        vec![vec![down(US_SHIFT_L), down(KEY_3), up(KEY_3), up(US_SHIFT_L)]]
    );
}

#[test]
fn test_empty_input_injects_nothing() {
    let mut session = RecordingSession::us_keyboard();
    let log = session.log();

    let outcome = Injector::new(&mut session, &InjectorConfig::default())
        .unwrap()
        .run(&b""[..])
        .unwrap();

    assert_eq!(outcome, RunOutcome { typed: 0, stop: StopReason::EndOfInput });
    assert!(log.borrow().events.is_empty());
}

#[test]
fn test_every_character_is_flushed_inside_its_grab() {
    let mut session = RecordingSession::us_keyboard();
    let log = session.log();

    Injector::new(&mut session, &InjectorConfig::default())
        .unwrap()
        .run(&b"ab"[..])
        .unwrap();

    assert_eq!(
        log.borrow().events,
        vec![
            SessionEvent::GrabControl(true),
            down(38),
            up(38),
            SessionEvent::Flush,
            SessionEvent::GrabControl(false),
            SessionEvent::GrabControl(true),
            down(56),
            up(56),
            SessionEvent::Flush,
            SessionEvent::GrabControl(false),
        ]
    );
}

#[test]
fn test_every_key_event_carries_the_configured_delay() {
    let mut session = RecordingSession::us_keyboard();
    let log = session.log();
    let config = InjectorConfig {
        key_event_delay: Duration::from_millis(3),
        ..Default::default()
    };

    Injector::new(&mut session, &config)
        .unwrap()
        .run(&b"A~z"[..])
        .unwrap();

    let delays = log.borrow().key_delays_ms.clone();
    assert_eq!(delays.len(), 4 + 4 + 2);
    assert!(delays.iter().all(|&d| d == 3));
}

#[test]
fn test_unsupported_byte_aborts_without_processing_the_rest() {
    // Arrange: 'a', then BEL, then 'b' which must never be typed.
    let mut session = RecordingSession::us_keyboard();
    let log = session.log();

    // Act
    let result = Injector::new(&mut session, &InjectorConfig::default())
        .unwrap()
        .run(&b"a\x07b\n"[..]);

    // Assert
    assert!(matches!(
        result,
        Err(InjectError::UnsupportedCharacter(ResolveError::UnsupportedCharacter(0x07)))
    ));
    assert_eq!(log.borrow().key_groups(), vec![vec![down(38), up(38)]]);
}

#[test]
fn test_unmapped_keysym_fails_with_no_physical_mapping() {
    let mut session = RecordingSession::us_keyboard().without_mapping(Keysym::from_raw(0x7C));
    let log = session.log();

    let result = Injector::new(&mut session, &InjectorConfig::default())
        .unwrap()
        .run(&b"|"[..]);

    match result {
        Err(InjectError::NoPhysicalMapping { keysym }) => {
            assert_eq!(keysym.name(), Some("bar"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // Shift was never pressed, so nothing can be left latched.
    assert!(log.borrow().events.is_empty());
}

#[test]
fn test_missing_shift_fails_before_any_input_is_read() {
    let mut session = RecordingSession::us_keyboard().without_mapping(Keysym::SHIFT_L);

    let result = Injector::new(&mut session, &InjectorConfig::default());

    assert!(matches!(result, Err(InjectError::NoShiftMapping { .. })));
}

#[test]
fn test_failed_key_press_still_releases_shift() {
    // Key event 0 is Shift down; event 1 (the key down for 'Q') fails.
    let mut session = RecordingSession::us_keyboard().failing_key_event_at(1);
    let log = session.log();

    let result = Injector::new(&mut session, &InjectorConfig::default())
        .unwrap()
        .run(&b"Q"[..]);

    assert!(matches!(result, Err(InjectError::Platform(_))));
    assert_eq!(
        log.borrow().events,
        vec![
            SessionEvent::GrabControl(true),
            down(US_SHIFT_L),
            up(US_SHIFT_L),
            SessionEvent::GrabControl(false),
        ]
    );
}

#[test]
fn test_session_is_released_on_success_and_failure() {
    for input in [&b"ok\n"[..], &b"\x01"[..]] {
        let mut session = RecordingSession::us_keyboard();
        let log = session.log();

        let _ = Injector::new(&mut session, &InjectorConfig::default())
            .unwrap()
            .run(input);
        assert!(!log.borrow().released);
        drop(session);

        assert!(log.borrow().released);
    }
}
