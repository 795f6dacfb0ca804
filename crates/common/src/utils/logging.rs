use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Targets logged by default when `RUST_LOG` is unset: the HTTP layer, the
/// user service and the request trace spans.
const DEFAULT_FILTER: &str = "info,server=info,service=info,tower_http=info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact human-readable logs on stdout.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event on stdout, with targets kept so handler and
/// storage failures can be told apart. Collection loads and saves from
/// `service` are included at debug.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(env_filter("info,server=info,service=debug,tower_http=info"))
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the output format from `LOG_FORMAT` (`json` or anything else for compact).
pub fn init_logging_from_env() {
    match std::env::var("LOG_FORMAT") {
        Ok(v) if v.eq_ignore_ascii_case("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}
