//! Domain models for totals-service.

mod document;
mod line_item;

pub use document::{DocumentHeader, DocumentKind, DocumentStatus};
pub use line_item::{items_from_value, LineItem, LineItemPatch};
pub(crate) use line_item::non_negative;
