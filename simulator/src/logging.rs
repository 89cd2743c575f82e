//! # Structured Logging
//!
//! Installs the global `tracing` subscriber for the simulator. Events go to
//! stderr, either human-readable or as JSON lines; stdout is reserved for
//! the report itself.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How log events are rendered.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Colored, one event per line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Installs the subscriber. Must run once, before any simulation starts.
///
/// `default_filter` applies only when `RUST_LOG` is unset, e.g.:
///
/// ```text
/// RUST_LOG=nova_selection_sim=debug,nova_selection=trace
/// ```
pub fn init_logging(default_filter: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .init(),
    }

    tracing::debug!(?format, "logging initialized");
}
