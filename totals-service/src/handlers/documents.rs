//! Preparing invoices and quotations for persistence.
//!
//! The save payload is rebuilt from raw items: totals posted by the client
//! are compared against the recomputed ones and never passed through.

use crate::dtos::{PrepareDocumentRequest, PrepareDocumentResponse};
use crate::engine::Draft;
use crate::handlers::record_outcome;
use crate::services::metrics::{
    CLIENT_TOTALS_MISMATCH_TOTAL, DOCUMENTS_PREPARED_TOTAL, DOCUMENT_AMOUNT_TOTAL,
    REQUEST_DURATION,
};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use service_core::error::AppError;
use tracing::{info, instrument, warn};

/// Validate a draft, recompute its totals and return the save payload.
#[instrument(
    skip(state, payload),
    fields(service = "totals-service", method = "PrepareDocument")
)]
pub async fn prepare_document(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PrepareDocumentResponse>, AppError> {
    let timer = REQUEST_DURATION
        .with_label_values(&["PrepareDocument"])
        .start_timer();

    let result = payload
        .map_err(AppError::from)
        .and_then(|Json(body)| prepare(&state, &body));
    record_outcome("PrepareDocument", &result);
    timer.observe_duration();

    result.map(Json)
}

fn prepare(state: &AppState, body: &Value) -> Result<PrepareDocumentResponse, AppError> {
    let policy = &state.config.policy;
    let request = PrepareDocumentRequest::from_json(body)?;
    request.check_status()?;

    if request.items.len() > policy.max_line_items {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "A document may have at most {} items",
            policy.max_line_items
        )));
    }

    let kind = request.kind;
    let mut draft = Draft::from_parts(
        kind,
        request.header,
        request.items,
        request.discount,
        request.tax_rate,
    );
    let document = draft.submit()?;

    let mismatches = request.client_totals.mismatches(&document.totals);
    if !mismatches.is_empty() {
        CLIENT_TOTALS_MISMATCH_TOTAL
            .with_label_values(&[kind.as_str()])
            .inc();
        warn!(
            kind = kind.as_str(),
            fields = ?mismatches,
            grand_total = %document.totals.grand_total,
            "Client totals disagree with recomputed totals"
        );
        if policy.reject_client_mismatch {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Client totals do not match: {}",
                mismatches.join(", ")
            )));
        }
    }

    DOCUMENTS_PREPARED_TOTAL
        .with_label_values(&[kind.as_str()])
        .inc();
    if document.totals.grand_total > Decimal::ZERO {
        DOCUMENT_AMOUNT_TOTAL
            .with_label_values(&[kind.as_str()])
            .inc_by(document.totals.grand_total.to_f64().unwrap_or(0.0));
    }

    info!(
        kind = kind.as_str(),
        items = document.items.len(),
        grand_total = %document.totals.grand_total,
        "Document prepared"
    );

    Ok(PrepareDocumentResponse {
        client_totals_matched: (!request.client_totals.is_empty())
            .then_some(mismatches.is_empty()),
        document,
        overridden_fields: mismatches,
    })
}
