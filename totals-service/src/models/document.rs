//! Invoice and quotation document models for totals-service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Kind of commercial document a draft becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Quotation,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Quotation => "quotation",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(DocumentKind::Invoice),
            "quotation" | "quote" => Some(DocumentKind::Quotation),
            _ => None,
        }
    }

    /// Statuses the persistence layer may assign to this kind.
    pub fn allowed_statuses(&self) -> &'static [DocumentStatus] {
        match self {
            DocumentKind::Invoice => &[
                DocumentStatus::Pending,
                DocumentStatus::Paid,
                DocumentStatus::Cancelled,
                DocumentStatus::Overdue,
            ],
            DocumentKind::Quotation => &[
                DocumentStatus::Pending,
                DocumentStatus::Accepted,
                DocumentStatus::Rejected,
                DocumentStatus::Overdue,
            ],
        }
    }
}

/// Document status, assigned by the persistence service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Paid,
    Accepted,
    Cancelled,
    Rejected,
    Overdue,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Paid => "paid",
            DocumentStatus::Accepted => "accepted",
            DocumentStatus::Cancelled => "cancelled",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Overdue => "overdue",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(DocumentStatus::Pending),
            "paid" => Some(DocumentStatus::Paid),
            "accepted" => Some(DocumentStatus::Accepted),
            "cancelled" | "canceled" => Some(DocumentStatus::Cancelled),
            "rejected" => Some(DocumentStatus::Rejected),
            "overdue" => Some(DocumentStatus::Overdue),
            _ => None,
        }
    }

    /// Only pending documents may still have their lines edited.
    pub fn is_editable(&self) -> bool {
        matches!(self, DocumentStatus::Pending)
    }
}

/// Header fields of an invoice or quotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_dates"))]
pub struct DocumentHeader {
    #[validate(length(min = 1, message = "Client is required"))]
    pub client: String,
    pub issue_date: Option<NaiveDate>,
    /// Payment due date for invoices, valid-until date for quotations.
    pub due_date: Option<NaiveDate>,
    pub terms: Option<String>,
    pub notes: Option<String>,
}

fn validate_dates(header: &DocumentHeader) -> Result<(), ValidationError> {
    match (header.issue_date, header.due_date) {
        (Some(issued), Some(due)) if due < issued => {
            let mut err = ValidationError::new("due_before_issue");
            err.message = Some("Due date cannot be before the issue date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn kinds_round_trip_through_strings() {
        for kind in [DocumentKind::Invoice, DocumentKind::Quotation] {
            assert_eq!(DocumentKind::from_string(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::from_string("receipt"), None);
    }

    #[test]
    fn quotation_cannot_be_paid() {
        let statuses = DocumentKind::Quotation.allowed_statuses();
        assert!(statuses.contains(&DocumentStatus::Accepted));
        assert!(!statuses.contains(&DocumentStatus::Paid));
    }

    #[test]
    fn only_pending_is_editable() {
        assert!(DocumentStatus::Pending.is_editable());
        assert!(!DocumentStatus::Paid.is_editable());
        assert!(!DocumentStatus::Overdue.is_editable());
    }

    #[test]
    fn header_requires_client() {
        let header = DocumentHeader::default();
        let errors = header.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("client"));
    }

    #[test]
    fn header_rejects_due_before_issue() {
        let header = DocumentHeader {
            client: "Acme Ltd".to_string(),
            issue_date: Some(date(2026, 3, 10)),
            due_date: Some(date(2026, 3, 1)),
            ..Default::default()
        };
        assert!(header.validate().is_err());

        let header = DocumentHeader {
            due_date: Some(date(2026, 4, 10)),
            ..header
        };
        assert!(header.validate().is_ok());
    }
}
