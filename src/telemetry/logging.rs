use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::LoggingConfig;
use crate::error::Error;

/// Initialize the logging system
pub fn init_logging(config: &LoggingConfig) -> Result<(), Error> {
    let log_level = parse_level(&config.level);

    let filter = EnvFilter::from_default_env().add_directive(log_level.into());
    let registry = Registry::default().with(filter);

    let installed = if config.structured {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_ansi(true),
            )
            .try_init()
    };

    installed.map_err(|e| Error::Internal(format!("Failed to set global default subscriber: {}", e)))
}

/// Unknown levels fall back to info
fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Install a test-writer subscriber; later calls are no-ops
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::DEBUG.into());

    let fmt_layer = fmt::layer().with_test_writer().with_target(true).with_ansi(false);

    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
