//! Tracing subscriber setup for the binary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;

/// Filter directive for `level`: quiet dependencies, verbose crate.
pub fn filter_directive(level: &str) -> String {
    format!("warn,locate_my_city={level},locate={level}")
}

/// Install the global subscriber. Call once, at the top of `main`.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so
/// stdout stays clean for JSON results.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&settings.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
