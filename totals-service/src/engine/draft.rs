//! Editable invoice/quotation drafts.
//!
//! A draft owns its item list. Totals are never stored on it: every read
//! recomputes them from the current items and adjustments.

use crate::engine::totals::{
    compute_breakdown, compute_document_totals, DocumentTotals, TotalsBreakdown,
};
use crate::engine::TotalsError;
use crate::models::{non_negative, DocumentHeader, DocumentKind, LineItem, LineItemPatch};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

/// Lifecycle of a draft: `Empty -> HasItems -> Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Empty,
    HasItems,
    Submitted,
}

/// In-memory invoice or quotation being edited.
#[derive(Debug, Clone)]
pub struct Draft {
    kind: DocumentKind,
    header: DocumentHeader,
    items: Vec<LineItem>,
    discount: Decimal,
    tax_rate: Decimal,
    submitted: bool,
}

/// Frozen document handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedDocument {
    pub kind: DocumentKind,
    pub header: DocumentHeader,
    pub items: Vec<LineItem>,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    #[serde(flatten)]
    pub totals: DocumentTotals,
}

impl Draft {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            header: DocumentHeader::default(),
            items: Vec::new(),
            discount: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            submitted: false,
        }
    }

    /// Rebuild a draft from a complete form submission.
    pub fn from_parts(
        kind: DocumentKind,
        header: DocumentHeader,
        items: Vec<LineItem>,
        discount: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            kind,
            header,
            items,
            discount: non_negative(discount),
            tax_rate: non_negative(tax_rate),
            submitted: false,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn state(&self) -> DraftState {
        if self.submitted {
            DraftState::Submitted
        } else if self.items.is_empty() {
            DraftState::Empty
        } else {
            DraftState::HasItems
        }
    }

    pub fn set_header(&mut self, header: DocumentHeader) -> Result<(), TotalsError> {
        self.ensure_editable()?;
        self.header = header;
        Ok(())
    }

    /// Append a line and return its index.
    pub fn add_item(&mut self, item: LineItem) -> Result<usize, TotalsError> {
        self.ensure_editable()?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    pub fn update_item(
        &mut self,
        index: usize,
        patch: LineItemPatch,
    ) -> Result<&LineItem, TotalsError> {
        self.ensure_editable()?;
        let item = self
            .items
            .get_mut(index)
            .ok_or(TotalsError::ItemNotFound { index })?;
        item.apply(patch);
        Ok(item)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, TotalsError> {
        self.ensure_editable()?;
        if index >= self.items.len() {
            return Err(TotalsError::ItemNotFound { index });
        }
        Ok(self.items.remove(index))
    }

    /// Set the flat document discount. Negative values become zero.
    pub fn set_discount(&mut self, discount: Decimal) -> Result<(), TotalsError> {
        self.ensure_editable()?;
        self.discount = non_negative(discount);
        Ok(())
    }

    /// Set the document tax rate in percent. Negative values become zero.
    pub fn set_tax_rate(&mut self, tax_rate: Decimal) -> Result<(), TotalsError> {
        self.ensure_editable()?;
        self.tax_rate = non_negative(tax_rate);
        Ok(())
    }

    pub fn totals(&self) -> Result<DocumentTotals, TotalsError> {
        compute_document_totals(&self.items, self.discount, self.tax_rate)
    }

    pub fn breakdown(&self) -> Result<TotalsBreakdown, TotalsError> {
        compute_breakdown(&self.items, self.discount, self.tax_rate)
    }

    /// Validate and freeze the draft, producing the save payload.
    ///
    /// A draft that fails validation stays editable.
    pub fn submit(&mut self) -> Result<SubmittedDocument, TotalsError> {
        self.ensure_editable()?;

        if self.items.is_empty() {
            return Err(TotalsError::EmptyDocument);
        }
        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.description.trim().is_empty())
        {
            return Err(TotalsError::MissingField {
                index,
                field: "description",
            });
        }
        self.header.validate()?;

        let totals = self.totals()?;
        self.submitted = true;

        Ok(SubmittedDocument {
            kind: self.kind,
            header: self.header.clone(),
            items: self.items.clone(),
            discount: self.discount,
            tax_rate: self.tax_rate,
            totals,
        })
    }

    fn ensure_editable(&self) -> Result<(), TotalsError> {
        if self.submitted {
            return Err(TotalsError::DraftSubmitted);
        }
        Ok(())
    }
}
