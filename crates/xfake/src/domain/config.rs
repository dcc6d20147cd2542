//! Injector configuration types.
//!
//! [`InjectorConfig`] is the single source of truth for all runtime settings.
//! xfake exposes no command-line flags, config file, or environment variables
//! for these values: the binary always runs with [`InjectorConfig::default`].
//! Tests build custom values directly.

use std::time::Duration;

use thiserror::Error;
use xfake_core::Keysym;

/// Primary display tried first at startup.
pub const PRIMARY_DISPLAY: &str = ":0";

/// Fallback display tried when the primary one cannot be opened.
pub const SECONDARY_DISPLAY: &str = ":1";

/// Delay passed with every synthesized key event.
///
/// XTest queues each event to be processed this long after the previous one.
/// With a delay of zero, rapid successive characters were observed to arrive
/// out of order on Xorg even with a flush after every character.  One
/// millisecond was found empirically to keep ordering intact; other servers
/// may need a different value.
pub const DEFAULT_KEY_EVENT_DELAY: Duration = Duration::from_millis(1);

/// Error returned by [`InjectorConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No display endpoints were listed.
    #[error("no display endpoints configured")]
    NoDisplayCandidates,

    /// The key event delay must be at least one millisecond.
    #[error("key event delay must be nonzero (got {0:?})")]
    ZeroKeyEventDelay(Duration),
}

/// All runtime configuration for the injection loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorConfig {
    /// Display names tried in order until one opens.
    pub display_candidates: Vec<String>,

    /// Delay attached to every key-down and key-up event.
    ///
    /// XTest takes this in whole milliseconds; sub-millisecond parts are
    /// dropped.
    pub key_event_delay: Duration,

    /// The modifier held for characters that need Shift.
    pub modifier: Keysym,

    /// Whether each character is wrapped in `XTestGrabControl(True/False)`,
    /// so injected events are processed even while another client holds a
    /// server grab.
    pub grab_control: bool,
}

impl Default for InjectorConfig {
    /// | Field              | Default          |
    /// |--------------------|------------------|
    /// | display_candidates | `":0"`, `":1"`   |
    /// | key_event_delay    | 1 ms             |
    /// | modifier           | `XK_Shift_L`     |
    /// | grab_control       | `true`           |
    fn default() -> Self {
        Self {
            display_candidates: vec![PRIMARY_DISPLAY.to_string(), SECONDARY_DISPLAY.to_string()],
            key_event_delay: DEFAULT_KEY_EVENT_DELAY,
            modifier: Keysym::SHIFT_L,
            grab_control: true,
        }
    }
}

impl InjectorConfig {
    /// Checks the invariants the injection loop relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no display is listed or when the key event
    /// delay rounds down to zero milliseconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_candidates.is_empty() {
            return Err(ConfigError::NoDisplayCandidates);
        }
        if self.key_event_delay_ms() == 0 {
            return Err(ConfigError::ZeroKeyEventDelay(self.key_event_delay));
        }
        Ok(())
    }

    /// The key event delay in the whole milliseconds XTest expects.
    pub fn key_event_delay_ms(&self) -> u64 {
        u64::try_from(self.key_event_delay.as_millis()).unwrap_or(u64::MAX)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tries_display_0_then_1() {
        // Arrange / Act
        let cfg = InjectorConfig::default();
        // Assert
        assert_eq!(cfg.display_candidates, vec![":0".to_string(), ":1".to_string()]);
    }

    #[test]
    fn test_default_delay_is_one_millisecond() {
        let cfg = InjectorConfig::default();
        assert_eq!(cfg.key_event_delay, Duration::from_millis(1));
        assert_eq!(cfg.key_event_delay_ms(), 1);
    }

    #[test]
    fn test_default_modifier_is_left_shift() {
        assert_eq!(InjectorConfig::default().modifier, Keysym::SHIFT_L);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(InjectorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_delay_is_rejected() {
        let cfg = InjectorConfig {
            key_event_delay: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroKeyEventDelay(Duration::ZERO))
        );
    }

    #[test]
    fn test_sub_millisecond_delay_is_rejected() {
        // XTest only sees whole milliseconds, so 500µs would become 0.
        let cfg = InjectorConfig {
            key_event_delay: Duration::from_micros(500),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_empty_display_list_is_rejected() {
        let cfg = InjectorConfig {
            display_candidates: Vec::new(),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoDisplayCandidates));
    }
}
