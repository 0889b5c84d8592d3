//! Line item, tax and document total computation.
//!
//! Every function here is pure. Amounts are accumulated at full decimal
//! precision and rounded to currency scale only when they are returned, so
//! rounding error never compounds across many lines.
//!
//! Tax model: each line carries a `taxable` flag and the document carries
//! one tax rate. The flat document discount is subtracted after tax.

use crate::engine::TotalsError;
use crate::models::{non_negative, LineItem};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Decimal places used for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Aggregate monetary values of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
}

impl DocumentTotals {
    pub fn zero() -> Self {
        Self {
            subtotal: round_currency(Decimal::ZERO),
            tax_amount: round_currency(Decimal::ZERO),
            discount_amount: round_currency(Decimal::ZERO),
            grand_total: round_currency(Decimal::ZERO),
        }
    }
}

/// Display amounts for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub line_amount: Decimal,
    pub tax_amount: Decimal,
}

/// Per-line amounts together with the document totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsBreakdown {
    pub lines: Vec<LineBreakdown>,
    #[serde(flatten)]
    pub totals: DocumentTotals,
}

/// Round to currency scale, half away from zero, always with two places.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Discounted amount of one line, rounded for display.
pub fn compute_line_amount(item: &LineItem) -> Result<Decimal, TotalsError> {
    line_amount_exact(item).map(round_currency)
}

/// Tax owed on one line, rounded for display.
///
/// Non-taxable lines owe nothing regardless of the document rate.
pub fn compute_tax(
    item: &LineItem,
    line_amount: Decimal,
    document_tax_rate: Decimal,
) -> Result<Decimal, TotalsError> {
    tax_exact(item, line_amount, non_negative(document_tax_rate)).map(round_currency)
}

/// Recompute the totals of a document from scratch.
///
/// `grand_total` is derived from the already rounded components, so
/// `grand_total == subtotal + tax_amount - discount_amount` holds exactly.
/// It may be negative when the discount exceeds the taxed subtotal.
pub fn compute_document_totals(
    items: &[LineItem],
    document_discount: Decimal,
    document_tax_rate: Decimal,
) -> Result<DocumentTotals, TotalsError> {
    accumulate(items, document_discount, document_tax_rate, |_| {})
}

/// Like [`compute_document_totals`], also returning each line's amounts.
pub fn compute_breakdown(
    items: &[LineItem],
    document_discount: Decimal,
    document_tax_rate: Decimal,
) -> Result<TotalsBreakdown, TotalsError> {
    let mut lines = Vec::with_capacity(items.len());
    let totals = accumulate(items, document_discount, document_tax_rate, |line| {
        lines.push(line)
    })?;
    Ok(TotalsBreakdown { lines, totals })
}

fn accumulate(
    items: &[LineItem],
    document_discount: Decimal,
    document_tax_rate: Decimal,
    mut on_line: impl FnMut(LineBreakdown),
) -> Result<DocumentTotals, TotalsError> {
    let rate = non_negative(document_tax_rate);
    let mut subtotal = Decimal::ZERO;
    let mut tax_amount = Decimal::ZERO;

    for item in items {
        let line_amount = line_amount_exact(item)?;
        let line_tax = tax_exact(item, line_amount, rate)?;

        subtotal = subtotal
            .checked_add(line_amount)
            .ok_or(TotalsError::Overflow)?;
        tax_amount = tax_amount
            .checked_add(line_tax)
            .ok_or(TotalsError::Overflow)?;

        on_line(LineBreakdown {
            line_amount: round_currency(line_amount),
            tax_amount: round_currency(line_tax),
        });
    }

    let subtotal = round_currency(subtotal);
    let tax_amount = round_currency(tax_amount);
    let discount_amount = round_currency(non_negative(document_discount));
    let grand_total = subtotal
        .checked_add(tax_amount)
        .and_then(|gross| gross.checked_sub(discount_amount))
        .ok_or(TotalsError::Overflow)?;

    Ok(DocumentTotals {
        subtotal,
        tax_amount,
        discount_amount,
        grand_total: round_currency(grand_total),
    })
}

fn line_amount_exact(item: &LineItem) -> Result<Decimal, TotalsError> {
    let raw = item
        .quantity
        .checked_mul(item.unit_price)
        .ok_or(TotalsError::Overflow)?;
    let discount_value = percent_of(raw, item.discount_percent)?;
    raw.checked_sub(discount_value).ok_or(TotalsError::Overflow)
}

fn tax_exact(item: &LineItem, line_amount: Decimal, rate: Decimal) -> Result<Decimal, TotalsError> {
    if !item.taxable {
        return Ok(Decimal::ZERO);
    }
    percent_of(line_amount, rate)
}

fn percent_of(amount: Decimal, percent: Decimal) -> Result<Decimal, TotalsError> {
    amount
        .checked_mul(percent)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(TotalsError::Overflow)
}
