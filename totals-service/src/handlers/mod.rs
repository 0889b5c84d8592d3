//! HTTP handlers for totals-service.

pub mod documents;
pub mod health;
pub mod totals;

pub use documents::prepare_document;
pub use health::{health_check, metrics_handler, readiness_check};
pub use totals::compute_totals;

use crate::services::metrics::{ERRORS_TOTAL, REQUESTS_TOTAL};
use service_core::error::AppError;
use tracing::warn;

/// Count the outcome of a handler call.
fn record_outcome<T>(method: &str, result: &Result<T, AppError>) {
    match result {
        Ok(_) => REQUESTS_TOTAL.with_label_values(&[method, "ok"]).inc(),
        Err(e) => {
            warn!(method, error = %e, "Request failed");
            REQUESTS_TOTAL.with_label_values(&[method, e.kind()]).inc();
            ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
        }
    }
}
