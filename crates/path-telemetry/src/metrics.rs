//! Prometheus metrics for path attestation.
//!
//! All metrics follow the naming convention: `bgpsec_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., chains_built_total)
//! - **Histogram**: Distribution of values (e.g., verification_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BUILDER METRICS
    // =========================================================================

    /// Hops appended by the local speaker
    pub static ref CHAINS_BUILT: Counter = Counter::new(
        "bgpsec_builder_hops_signed_total",
        "Total number of hops signed and appended by the local speaker"
    ).expect("metric creation failed");

    /// Builder failures by kind
    pub static ref BUILD_FAILURES: CounterVec = CounterVec::new(
        Opts::new("bgpsec_builder_failures_total", "Builder failures"),
        &["kind"]  // kind: signing/encoding/chain_state
    ).expect("metric creation failed");

    /// Signing duration
    pub static ref SIGNING_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "bgpsec_builder_signing_duration_seconds",
            "Time spent producing one hop signature"
        ).buckets(exponential_buckets(0.00005, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // VERIFIER METRICS
    // =========================================================================

    /// Chain verifications by outcome and reason
    pub static ref CHAIN_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("bgpsec_verifier_chains_total", "Chain verifications"),
        &["outcome", "reason"]  // outcome: valid/invalid/indeterminate
    ).expect("metric creation failed");

    /// Hop signatures actually checked (short-circuited hops are not counted)
    pub static ref HOPS_VERIFIED: Counter = Counter::new(
        "bgpsec_verifier_hops_verified_total",
        "Total number of hop signatures checked"
    ).expect("metric creation failed");

    /// Whole-chain verification duration
    pub static ref VERIFICATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "bgpsec_verifier_chain_duration_seconds",
            "Time spent verifying one attestation chain"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // KEY STORE METRICS
    // =========================================================================

    /// Key lookups that did not yield a key
    pub static ref KEY_LOOKUP_FAILURES: CounterVec = CounterVec::new(
        Opts::new("bgpsec_keystore_lookup_failures_total", "Failed key lookups"),
        &["kind"]  // kind: not_found/unavailable (timeouts count as unavailable)
    ).expect("metric creation failed");
}

/// Handle to the metrics registry.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Builder
        Box::new(CHAINS_BUILT.clone()),
        Box::new(BUILD_FAILURES.clone()),
        Box::new(SIGNING_DURATION.clone()),
        // Verifier
        Box::new(CHAIN_VERIFICATIONS.clone()),
        Box::new(HOPS_VERIFIED.clone()),
        Box::new(VERIFICATION_DURATION.clone()),
        // Key store
        Box::new(KEY_LOOKUP_FAILURES.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
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
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
