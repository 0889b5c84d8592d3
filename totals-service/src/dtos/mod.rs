//! Request and response bodies for totals-service.
//!
//! Bodies are decoded from raw JSON rather than through derived
//! `Deserialize` so that malformed numbers degrade to zero instead of
//! rejecting the whole request.

use crate::engine::coerce::coerce_optional;
use crate::engine::{round_currency, DocumentTotals, SubmittedDocument};
use crate::models::{items_from_value, DocumentHeader, DocumentKind, DocumentStatus, LineItem};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use service_core::error::AppError;

fn object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object().ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Request body must be a JSON object"))
    })
}

/// Body of `POST /v1/totals`.
#[derive(Debug, Clone)]
pub struct TotalsRequest {
    pub items: Vec<LineItem>,
    pub discount: Decimal,
    pub tax_rate: Decimal,
}

impl TotalsRequest {
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let fields = object(body)?;
        Ok(Self {
            items: items_from_value(fields.get("items"))?,
            discount: coerce_optional(fields.get("discount")),
            tax_rate: coerce_optional(fields.get("taxRate")),
        })
    }
}

/// Body of `POST /v1/documents/prepare`.
#[derive(Debug, Clone)]
pub struct PrepareDocumentRequest {
    pub kind: DocumentKind,
    pub status: Option<DocumentStatus>,
    pub header: DocumentHeader,
    pub items: Vec<LineItem>,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub client_totals: ClientTotals,
}

impl PrepareDocumentRequest {
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let fields = object(body)?;

        let kind = fields
            .get("kind")
            .and_then(Value::as_str)
            .and_then(DocumentKind::from_string)
            .ok_or_else(|| {
                AppError::BadRequest(anyhow::anyhow!(
                    "kind must be \"invoice\" or \"quotation\""
                ))
            })?;

        let status = match fields.get("status") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_str()
                    .and_then(DocumentStatus::from_string)
                    .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Unknown status")))?,
            ),
        };

        let header = match fields.get("header") {
            None | Some(Value::Null) => DocumentHeader::default(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                AppError::BadRequest(anyhow::anyhow!("Invalid document header: {}", e))
            })?,
        };

        Ok(Self {
            kind,
            status,
            header,
            items: items_from_value(fields.get("items"))?,
            discount: coerce_optional(fields.get("discount")),
            tax_rate: coerce_optional(fields.get("taxRate")),
            client_totals: ClientTotals::from_fields(fields),
        })
    }

    /// Ensure an existing document may still be edited.
    pub fn check_status(&self) -> Result<(), AppError> {
        let Some(status) = self.status else {
            return Ok(());
        };
        if !self.kind.allowed_statuses().contains(&status) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Status {} is not valid for a {}",
                status.as_str(),
                self.kind.as_str()
            )));
        }
        if !status.is_editable() {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Only pending documents can be edited, this {} is {}",
                self.kind.as_str(),
                status.as_str()
            )));
        }
        Ok(())
    }
}

/// Aggregates the client computed itself. Never trusted, only compared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTotals {
    pub subtotal: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub grand_total: Option<Decimal>,
}

impl ClientTotals {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let read = |key: &str| match fields.get(key) {
            None | Some(Value::Null) => None,
            value => Some(coerce_optional(value)),
        };
        Self {
            subtotal: read("subtotal"),
            tax_amount: read("taxAmount"),
            discount_amount: read("discountAmount"),
            grand_total: read("grandTotal"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the supplied aggregates that differ from `server` once
    /// rounded to currency scale.
    pub fn mismatches(&self, server: &DocumentTotals) -> Vec<&'static str> {
        [
            ("subtotal", self.subtotal, server.subtotal),
            ("taxAmount", self.tax_amount, server.tax_amount),
            ("discountAmount", self.discount_amount, server.discount_amount),
            ("grandTotal", self.grand_total, server.grand_total),
        ]
        .into_iter()
        .filter_map(|(name, client, server)| match client {
            Some(client) if round_currency(client) != server => Some(name),
            _ => None,
        })
        .collect()
    }
}

/// Response of `POST /v1/documents/prepare`: the save payload plus the
/// outcome of the client totals check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareDocumentResponse {
    #[serde(flatten)]
    pub document: SubmittedDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_totals_matched: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden_fields: Vec<&'static str>,
}
