//! # SF Telemetry
//!
//! Logging and metrics for envelope processing.
//!
//! ## Components
//!
//! - **Tracing**: `tracing-subscriber` registry with `EnvFilter` and a pretty
//!   or JSON formatter
//! - **Metrics**: Prometheus counters, gauge and histogram for build and
//!   verification outcomes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sf_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SF_SERVICE_NAME` | `securefabric` | Service name in logs |
//! | `SF_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `SF_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `SF_CONSOLE_OUTPUT` | `true` | Write logs to stderr |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, record_build_failure, record_built, record_verification, register_metrics,
    set_windows_tracked, verify_timer, HistogramTimer, MetricsHandle, ENVELOPES_ACCEPTED,
    ENVELOPES_BUILT, ENVELOPES_REJECTED, ENVELOPE_BUILD_FAILURES, REPLAY_WINDOWS_TRACKED,
    VERIFY_DURATION,
};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Global subscriber could not be installed
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Configuration value rejected
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first; they do not depend on the subscriber.
    let metrics_handle = register_metrics()?;
    let tracing_guard = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}
