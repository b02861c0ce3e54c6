pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::{self, format::FmtSpan}};

const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Calling it again is harmless; the first subscriber stays installed.
pub fn init() {
    init_with_default(DEFAULT_DIRECTIVE);
}

pub fn init_with_default(directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive));

    let span_events = match env_filter.max_level_hint() {
        Some(level) if level >= LevelFilter::DEBUG => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_names(true)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
