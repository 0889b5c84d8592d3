//! Errors raised by the totals engine and draft documents.

use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TotalsError {
    #[error("Items must be a list")]
    ItemsNotList,

    #[error("Item {index} must be an object")]
    ItemNotObject { index: usize },

    #[error("Add at least one item")]
    EmptyDocument,

    #[error("Item {index}: {field} is required")]
    MissingField { index: usize, field: &'static str },

    #[error("Item {index} does not exist")]
    ItemNotFound { index: usize },

    #[error("Document has already been submitted")]
    DraftSubmitted,

    #[error("Amount is too large to compute")]
    Overflow,

    #[error("Invalid document header: {0}")]
    InvalidHeader(#[from] validator::ValidationErrors),
}

impl From<TotalsError> for AppError {
    fn from(err: TotalsError) -> Self {
        match err {
            TotalsError::InvalidHeader(errors) => AppError::ValidationError(errors),
            TotalsError::DraftSubmitted => AppError::Conflict(anyhow::Error::new(err)),
            TotalsError::Overflow | TotalsError::ItemNotFound { .. } => {
                AppError::BadRequest(anyhow::Error::new(err))
            }
            TotalsError::ItemsNotList
            | TotalsError::ItemNotObject { .. }
            | TotalsError::EmptyDocument
            | TotalsError::MissingField { .. } => {
                AppError::UnprocessableEntity(anyhow::Error::new(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_unprocessable() {
        let err = AppError::from(TotalsError::EmptyDocument);
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(err.to_string(), "Unprocessable entity: Add at least one item");
    }

    #[test]
    fn missing_field_names_the_item() {
        let err = TotalsError::MissingField {
            index: 2,
            field: "description",
        };
        assert_eq!(err.to_string(), "Item 2: description is required");
    }

    #[test]
    fn submitted_draft_is_a_conflict() {
        assert!(matches!(
            AppError::from(TotalsError::DraftSubmitted),
            AppError::Conflict(_)
        ));
    }
}
