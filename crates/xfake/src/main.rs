//! xfake entry point.
//!
//! Reads standard input and types it into the running X11 session.
//!
//! # Architecture
//!
//! ```text
//! main() -> run()
//!  └─ XDisplaySession::open(":0", ":1")   -- acquire the display
//!  └─ Injector::new(&mut session)          -- resolve Shift_L once
//!  └─ Injector::run(stdin)                 -- type until newline / EOF
//!  └─ report failure, then drop(session)   -- release the display
//! ```
//!
//! # Exit status
//!
//! | Outcome                                   | Status |
//! |-------------------------------------------|--------|
//! | newline, end of input, or read error      | 0      |
//! | no display, no Shift key, bad character   | 1      |
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! every character as it is typed.  Fatal errors are logged under the
//! `xfake::fatal` target, which stays enabled whatever `RUST_LOG` says, so a
//! failing run always explains itself.

use std::io;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

/// Target for the one diagnostic printed before a non-zero exit.
const FATAL_TARGET: &str = "xfake::fatal";

/// Builds the stderr filter: `directives` (usually `RUST_LOG`) or `warn`,
/// with [`FATAL_TARGET`] forced on at `error`.
///
/// Invalid directives are skipped rather than rejected.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    let base = directives.unwrap_or("warn");
    EnvFilter::new(format!("{base},{FATAL_TARGET}=error"))
}

fn main() -> ExitCode {
    // Initialise structured logging on stderr; stdout stays untouched.
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(status) => status,
        Err(err) => {
            error!(target: FATAL_TARGET, "{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_os = "linux")]
fn run() -> anyhow::Result<ExitCode> {
    use anyhow::Context;
    use tracing::info;
    use xfake::application::Injector;
    use xfake::domain::InjectorConfig;
    use xfake::infrastructure::session::xorg::XDisplaySession;

    let config = InjectorConfig::default();
    let mut session =
        XDisplaySession::open(&config.display_candidates).context("connecting to the X server")?;

    let result = Injector::new(&mut session, &config)
        .context("preparing keyboard")
        .and_then(|mut injector| {
            let stdin = io::stdin();
            injector.run(stdin.lock()).context("typing standard input")
        });

    // Report while the display is still open, then release it on every path.
    let status = match result {
        Ok(outcome) => {
            info!(typed = outcome.typed, stop = ?outcome.stop, "finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(target: FATAL_TARGET, "{err:#}");
            ExitCode::FAILURE
        }
    };
    drop(session);
    Ok(status)
}

#[cfg(not(target_os = "linux"))]
fn run() -> anyhow::Result<ExitCode> {
    anyhow::bail!("xfake needs an X11 display and is only supported on Linux")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
