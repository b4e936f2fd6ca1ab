//! Prometheus metrics for envelope processing.
//!
//! All metrics follow the naming convention: `sf_<object>_<metric>_<unit>`.
//! Reject and failure counters carry a `reason` label with the stable
//! snake_case reason name.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BUILDER
    // =========================================================================

    /// Envelopes built successfully
    pub static ref ENVELOPES_BUILT: Counter = Counter::new(
        "sf_envelopes_built_total",
        "Total number of envelopes built"
    ).expect("metric creation failed");

    /// Build failures by reason
    ///
    /// Labels: key, size, entropy, sequence_exhausted, invalid_sequence,
    /// associated_data, encryption
    pub static ref ENVELOPE_BUILD_FAILURES: CounterVec = CounterVec::new(
        Opts::new("sf_envelope_build_failures_total", "Total envelope build failures"),
        &["reason"]
    ).expect("metric creation failed");

    // =========================================================================
    // VERIFIER
    // =========================================================================

    /// Envelopes accepted
    pub static ref ENVELOPES_ACCEPTED: Counter = Counter::new(
        "sf_envelopes_accepted_total",
        "Total number of envelopes accepted by verification"
    ).expect("metric creation failed");

    /// Envelopes rejected by reason
    pub static ref ENVELOPES_REJECTED: CounterVec = CounterVec::new(
        Opts::new("sf_envelopes_rejected_total", "Total envelopes rejected by verification"),
        &["reason"]
    ).expect("metric creation failed");

    /// Verification latency
    pub static ref VERIFY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sf_envelope_verify_duration_seconds",
            "Time spent verifying one envelope"
        ).buckets(exponential_buckets(0.000_005, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // REPLAY STATE
    // =========================================================================

    /// Senders with a live replay window
    pub static ref REPLAY_WINDOWS_TRACKED: Gauge = Gauge::new(
        "sf_replay_windows_tracked",
        "Number of sender identities with replay state"
    ).expect("metric creation failed");
}

/// Handle proving metrics were registered.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    _registry: Registry,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; repeated registrations are ignored.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ENVELOPES_BUILT.clone()),
        Box::new(ENVELOPE_BUILD_FAILURES.clone()),
        Box::new(ENVELOPES_ACCEPTED.clone()),
        Box::new(ENVELOPES_REJECTED.clone()),
        Box::new(VERIFY_DURATION.clone()),
        Box::new(REPLAY_WINDOWS_TRACKED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Record a successful build.
pub fn record_built() {
    ENVELOPES_BUILT.inc();
}

/// Record a failed build.
pub fn record_build_failure(reason: &str) {
    ENVELOPE_BUILD_FAILURES.with_label_values(&[reason]).inc();
}

/// Record a verification outcome. `None` means accepted.
pub fn record_verification(rejected: Option<&str>) {
    match rejected {
        None => ENVELOPES_ACCEPTED.inc(),
        Some(reason) => ENVELOPES_REJECTED.with_label_values(&[reason]).inc(),
    }
}

/// Start timing one verification; observed into
/// `sf_envelope_verify_duration_seconds` on drop.
pub fn verify_timer() -> HistogramTimer {
    HistogramTimer::new(&VERIFY_DURATION)
}

/// Update the tracked-senders gauge.
pub fn set_windows_tracked(count: usize) {
    REPLAY_WINDOWS_TRACKED.set(count as f64);
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
