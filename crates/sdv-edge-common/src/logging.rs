//! ---
//! sdv_section: "01-core-functionality"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Shared primitives and utilities for the edge simulator."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "SDV_EDGE_LOG";

/// Available log formats for the simulator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Human-readable output for interactive runs.
    #[default]
    Pretty,
    /// Structured JSON for runs captured by a log collector.
    StructuredJson,
}

/// Initialize the tracing subscriber based on configuration and environment variables.
///
/// * `SDV_EDGE_LOG` can be set to override the log filter (e.g. `info`, `debug,hyper=warn`).
///   When unset the standard `RUST_LOG` variable is honoured, finally defaulting to
///   `info`, which matches the level an operator wants while watching a run.
/// * Everything goes to stdout; a finite simulator run has no rolling-file story.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); defaulting to info logging",
                LOG_ENV, err
            );
            EnvFilter::new("info")
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();

    info!(service = %service_name, format = ?config.format, "tracing initialised");
}
