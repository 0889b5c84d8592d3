//! Live totals for forms that are still being edited.

use crate::dtos::TotalsRequest;
use crate::engine::{compute_breakdown, TotalsBreakdown};
use crate::handlers::record_outcome;
use crate::services::metrics::REQUEST_DURATION;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;
use tracing::{debug, instrument};

/// Recompute line amounts and document totals from the posted items.
#[instrument(
    skip(state, payload),
    fields(service = "totals-service", method = "ComputeTotals")
)]
pub async fn compute_totals(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TotalsBreakdown>, AppError> {
    let timer = REQUEST_DURATION
        .with_label_values(&["ComputeTotals"])
        .start_timer();

    let result = payload
        .map_err(AppError::from)
        .and_then(|Json(body)| compute(&state, &body));
    record_outcome("ComputeTotals", &result);
    timer.observe_duration();

    result.map(Json)
}

fn compute(state: &AppState, body: &Value) -> Result<TotalsBreakdown, AppError> {
    let request = TotalsRequest::from_json(body)?;
    if request.items.len() > state.config.policy.max_line_items {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "A document may have at most {} items",
            state.config.policy.max_line_items
        )));
    }

    let breakdown = compute_breakdown(&request.items, request.discount, request.tax_rate)?;

    debug!(
        items = request.items.len(),
        subtotal = %breakdown.totals.subtotal,
        grand_total = %breakdown.totals.grand_total,
        "Totals computed"
    );

    Ok(breakdown)
}
