//! Line item model for totals-service.

use crate::engine::coerce::{coerce_decimal, coerce_flag, coerce_text};
use crate::engine::TotalsError;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

/// One row of an invoice or quotation draft.
///
/// Numeric fields are always normalised: quantity and unit price are
/// non-negative, the discount percentage lies in `[0, 100]`. Decoding goes
/// through [`LineItem::from_value`] so that normalisation cannot be skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    #[serde(rename = "discount")]
    pub discount_percent: Decimal,
    pub taxable: bool,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            taxable: true,
        }
    }
}

impl LineItem {
    /// Create a normalised line item.
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        discount_percent: Decimal,
        taxable: bool,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: non_negative(quantity),
            unit_price: non_negative(unit_price),
            discount_percent: clamp_percent(discount_percent),
            taxable,
        }
    }

    /// Decode one line item from loosely typed form JSON.
    ///
    /// Malformed numbers become zero; only a non-object entry is an error.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, TotalsError> {
        let fields = value
            .as_object()
            .ok_or(TotalsError::ItemNotObject { index })?;

        Ok(Self::new(
            coerce_text(fields.get("description")),
            decimal_field(fields, &["quantity", "qty"]),
            decimal_field(fields, &["price", "unitPrice", "unit_price"]),
            decimal_field(fields, &["discount", "discountPercent", "discount_percent"]),
            coerce_flag(fields.get("taxable"), true),
        ))
    }

    /// Apply a partial edit, re-normalising the touched fields.
    pub fn apply(&mut self, patch: LineItemPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = non_negative(quantity);
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = non_negative(unit_price);
        }
        if let Some(discount_percent) = patch.discount_percent {
            self.discount_percent = clamp_percent(discount_percent);
        }
        if let Some(taxable) = patch.taxable {
            self.taxable = taxable;
        }
    }
}

/// Partial edit of a line item, one field per form input.
#[derive(Debug, Clone, Default)]
pub struct LineItemPatch {
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub taxable: Option<bool>,
}

/// Decode the `items` field of a request body.
///
/// A missing or null field is an empty list.
pub fn items_from_value(value: Option<&Value>) -> Result<Vec<LineItem>, TotalsError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| LineItem::from_value(index, entry))
            .collect(),
        Some(_) => Err(TotalsError::ItemsNotList),
    }
}

fn decimal_field(fields: &Map<String, Value>, keys: &[&str]) -> Decimal {
    keys.iter()
        .find_map(|key| fields.get(*key).filter(|value| !value.is_null()))
        .map(coerce_decimal)
        .unwrap_or(Decimal::ZERO)
}

pub(crate) fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

fn clamp_percent(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn decodes_form_item() {
        let item = LineItem::from_value(
            0,
            &json!({
                "description": "Consulting",
                "quantity": "2",
                "price": 100,
                "discount": "10",
                "taxable": true
            }),
        )
        .unwrap();

        assert_eq!(item.description, "Consulting");
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit_price, dec!(100));
        assert_eq!(item.discount_percent, dec!(10));
        assert!(item.taxable);
    }

    #[test]
    fn accepts_field_aliases() {
        let item = LineItem::from_value(
            0,
            &json!({ "qty": 3, "unitPrice": "9.99", "discountPercent": 5 }),
        )
        .unwrap();

        assert_eq!(item.quantity, dec!(3));
        assert_eq!(item.unit_price, dec!(9.99));
        assert_eq!(item.discount_percent, dec!(5));
    }

    #[test]
    fn null_field_falls_through_to_alias() {
        let item = LineItem::from_value(
            0,
            &json!({ "price": null, "unitPrice": 5, "quantity": null, "qty": "2" }),
        )
        .unwrap();

        assert_eq!(item.unit_price, dec!(5));
        assert_eq!(item.quantity, dec!(2));
    }

    #[test]
    fn serialises_wire_names() {
        let item = LineItem::new("Widget", dec!(2), dec!(4.5), dec!(10), false);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["price"], "4.5");
        assert_eq!(json["discount"], "10");
        assert!(json.get("unit_price").is_none());
    }

    #[test]
    fn missing_and_malformed_fields_degrade_to_zero() {
        let item = LineItem::from_value(0, &json!({ "price": "abc" })).unwrap();

        assert_eq!(item.description, "");
        assert_eq!(item.quantity, Decimal::ZERO);
        assert_eq!(item.unit_price, Decimal::ZERO);
        assert_eq!(item.discount_percent, Decimal::ZERO);
        assert!(item.taxable);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let item = LineItem::from_value(
            0,
            &json!({ "quantity": -2, "price": -5, "discount": 150 }),
        )
        .unwrap();

        assert_eq!(item.quantity, Decimal::ZERO);
        assert_eq!(item.unit_price, Decimal::ZERO);
        assert_eq!(item.discount_percent, dec!(100));
    }

    #[test]
    fn rejects_non_object_entries() {
        let err = items_from_value(Some(&json!([{ "price": 1 }, 42]))).unwrap_err();
        assert!(matches!(err, TotalsError::ItemNotObject { index: 1 }));
    }

    #[test]
    fn rejects_non_list_items() {
        let err = items_from_value(Some(&json!("not a list"))).unwrap_err();
        assert!(matches!(err, TotalsError::ItemsNotList));
    }

    #[test]
    fn missing_items_is_empty() {
        assert!(items_from_value(None).unwrap().is_empty());
        assert!(items_from_value(Some(&Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn patch_renormalises_fields() {
        let mut item = LineItem::default();
        item.apply(LineItemPatch {
            quantity: Some(dec!(1.5)),
            discount_percent: Some(dec!(-3)),
            taxable: Some(false),
            ..Default::default()
        });

        assert_eq!(item.quantity, dec!(1.5));
        assert_eq!(item.discount_percent, Decimal::ZERO);
        assert!(!item.taxable);
    }
}
