//! Prometheus metrics for totals-service.
//!
//! Handler metrics live in the default `prometheus` registry. The per-route
//! HTTP metrics emitted by the service-core middleware go through the
//! `metrics` facade and are rendered by a `metrics-exporter-prometheus`
//! recorder. `/metrics` serves both.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// HTTP request counter by handler and outcome.
pub static REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "totals_requests_total",
        "Total number of totals-service requests",
        &["method", "status"]
    )
    .expect("Failed to register requests_total")
});

/// Request duration histogram by handler.
pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "totals_request_duration_seconds",
        "Request duration in seconds",
        &["method"],
        vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25]
    )
    .expect("Failed to register request_duration")
});

/// Documents prepared for persistence by kind.
pub static DOCUMENTS_PREPARED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "totals_documents_prepared_total",
        "Total number of documents prepared for persistence",
        &["kind"] // invoice, quotation
    )
    .expect("Failed to register documents_prepared_total")
});

/// Client-submitted totals that disagreed with the recomputed ones.
pub static CLIENT_TOTALS_MISMATCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "totals_client_mismatch_total",
        "Total number of documents whose client totals were wrong",
        &["kind"]
    )
    .expect("Failed to register client_mismatch_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "totals_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Prepared grand total amount by kind. Negative totals are not counted.
pub static DOCUMENT_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "totals_document_amount_total",
        "Total grand total amount of prepared documents",
        &["kind"]
    )
    .expect("Failed to register document_amount_total")
});

/// Recorder for the `metrics` facade. Installed once per process; `None`
/// when another recorder was already installed.
static HTTP_METRICS: Lazy<Option<PrometheusHandle>> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| tracing::warn!(error = %e, "Failed to install HTTP metrics recorder"))
        .ok()
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&HTTP_METRICS);
    Lazy::force(&REQUESTS_TOTAL);
    Lazy::force(&REQUEST_DURATION);
    Lazy::force(&DOCUMENTS_PREPARED_TOTAL);
    Lazy::force(&CLIENT_TOTALS_MISMATCH_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&DOCUMENT_AMOUNT_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut output = encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default();

    if let Some(handle) = HTTP_METRICS.as_ref() {
        output.push_str(&handle.render());
    }
    output
}
