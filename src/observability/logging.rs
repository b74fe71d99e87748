//! Logging initialization for `TokenJack`.
//!
//! Logs go to stderr so that `inspect` and `--format json` keep stdout
//! clean. Verbosity raises the level for this crate only; HTTP client
//! crates stay at `warn` unless `TOKENJACK_LOG_LEVEL` names them.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{ColorChoice, LogFormat};

/// Environment variable overriding `-v`.
pub const LOG_LEVEL_ENV: &str = "TOKENJACK_LOG_LEVEL";

/// Level for this crate at a given `-v` count. Saturates at `trace`.
#[must_use]
pub const fn crate_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter directive.
///
/// A bare level in `env_override` (`debug`) is scoped to this crate, like
/// `-v`. Anything with a target or a comma is passed through untouched, so
/// `TOKENJACK_LOG_LEVEL=tokenjack=debug,reqwest=trace` works as written.
#[must_use]
pub fn filter_directive(verbosity: u8, env_override: Option<&str>) -> String {
    let level = match env_override.map(str::trim) {
        Some(raw) if raw.contains('=') || raw.contains(',') => return raw.to_string(),
        Some(raw) if !raw.is_empty() => raw,
        _ => crate_level(verbosity),
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Installs the global subscriber. Repeated calls are ignored.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let env_override = std::env::var(LOG_LEVEL_ENV).ok();
    let directive = filter_directive(verbosity, env_override.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        EnvFilter::new(filter_directive(verbosity, None))
    });

    // Targets only matter once dependency logs can show up.
    let show_target = verbosity >= 2 || env_override.is_some();

    let use_ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(show_target)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
