//! Domain types for xfake.
//!
//! Pure data with no OS dependencies.  The only domain concept beyond the
//! resolver in `xfake-core` is the runtime configuration.

pub mod config;

pub use config::{ConfigError, InjectorConfig};
