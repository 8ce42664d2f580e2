//! Tracing/logging initialization.
//!
//! Output format and verbosity come from the environment: `RUST_LOG` drives
//! the filter (default `info`), `LOG_FORMAT` picks `json` (default) or
//! `pretty` for local development.

use tracing_subscriber::EnvFilter;

/// Build and install the subscriber.
///
/// Install failures (an earlier subscriber already registered) are ignored so
/// test binaries can call this freely.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let pretty = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("pretty"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if pretty {
        let _ = builder.pretty().try_init();
    } else {
        let _ = builder.json().try_init();
    }
}
