use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: request spans from the HTTP layer
/// plus store and user-check events from the service crate.
const DEFAULT_FILTER: &str = "info,service=debug,server=info,tower_http=info";

/// Output shape of the users/flights log stream, chosen by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON lines; anything else, or nothing, is compact.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op, so tests that
/// share a process can call it freely.
pub fn init_logging(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter()).with_target(false).with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn init_logging_default() { init_logging(LogFormat::Compact) }

pub fn init_logging_json() { init_logging(LogFormat::Json) }

/// Used by both service binaries at startup.
pub fn init_logging_from_env() {
    let setting = std::env::var("LOG_FORMAT").ok();
    init_logging(LogFormat::from_setting(setting.as_deref()));
}
