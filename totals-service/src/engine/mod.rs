//! Document totals engine.

pub mod coerce;
mod draft;
mod error;
mod totals;

pub use draft::{Draft, DraftState, SubmittedDocument};
pub use error::TotalsError;
pub use totals::{
    compute_breakdown, compute_document_totals, compute_line_amount, compute_tax, round_currency,
    DocumentTotals, LineBreakdown, TotalsBreakdown, CURRENCY_SCALE,
};
