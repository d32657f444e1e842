//! Metrics collection for observability

use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, register_int_gauge_with_registry, Counter, CounterVec,
    HistogramVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Backend client metrics
    pub backend_requests: CounterVec,
    pub backend_request_duration: HistogramVec,

    // Reconciliation metrics
    pub unmatched_polygons: IntGauge,

    // Dashboard metrics
    pub stale_responses: CounterVec,
    pub ignored_clicks: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let backend_requests = register_counter_vec_with_registry!(
            Opts::new("backend_requests_total", "Total readiness backend requests"),
            &["endpoint", "status"],
            registry
        )?;

        let backend_request_duration = register_histogram_vec_with_registry!(
            "backend_request_duration_seconds",
            "Readiness backend request duration in seconds",
            &["endpoint"],
            registry
        )?;

        let unmatched_polygons = register_int_gauge_with_registry!(
            Opts::new(
                "unmatched_polygons",
                "Boundary polygons without summary data in the last built layer"
            ),
            registry
        )?;

        let stale_responses = register_counter_vec_with_registry!(
            Opts::new("stale_responses_total", "Responses dropped because a newer request superseded them"),
            &["panel"],
            registry
        )?;

        let ignored_clicks = register_counter_with_registry!(
            Opts::new("ignored_clicks_total", "Polygon clicks that resolved to no region"),
            registry
        )?;

        Ok(Self {
            registry,
            backend_requests,
            backend_request_duration,
            unmatched_polygons,
            stale_responses,
            ignored_clicks,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record the outcome of a backend request
    pub fn record_backend_request(&self, endpoint: &str, outcome: &str, elapsed_secs: f64) {
        self.backend_requests
            .with_label_values(&[endpoint, outcome])
            .inc();
        self.backend_request_duration
            .with_label_values(&[endpoint])
            .observe(elapsed_secs);
    }

    /// Record how many polygons of a freshly built layer have no data
    pub fn record_unmatched_polygons(&self, count: usize) {
        self.unmatched_polygons.set(count as i64);
    }

    /// Record a response dropped as stale
    pub fn record_stale(&self, panel: &str) {
        self.stale_responses.with_label_values(&[panel]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
