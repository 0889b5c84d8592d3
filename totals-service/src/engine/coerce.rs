//! Lenient numeric coercion for form input.
//!
//! Form fields arrive as JSON numbers, numeric strings, empty strings or
//! garbage. None of these are errors: anything that does not start with a
//! number becomes zero, mirroring `parseFloat(x) || 0` on the client.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Coerce an arbitrary JSON value to a decimal, degrading to zero.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_float_prefix(s),
        _ => Decimal::ZERO,
    }
}

/// Coerce an optional JSON value, treating a missing field as zero.
pub fn coerce_optional(value: Option<&Value>) -> Decimal {
    value.map(coerce_decimal).unwrap_or(Decimal::ZERO)
}

/// Coerce a JSON value to a boolean flag.
///
/// Missing values take `default`.
pub fn coerce_flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        Some(_) => false,
    }
}

/// Coerce a JSON value to text. Non-string scalars are rendered.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse the longest numeric prefix of `input`, the way `parseFloat` does.
pub fn parse_float_prefix(input: &str) -> Decimal {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;
    let mut digits = int_digits;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        // "5." is still 5, so keep the dot only when it is followed by digits
        end = if frac_end > frac_start { frac_end } else { end };
    }

    if digits == 0 {
        return Decimal::ZERO;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let literal = &s[..end];
    let parsed = if int_digits == 0 {
        parse_decimal(&format!("{}0{}", &literal[..int_start], &literal[int_start..]))
    } else {
        parse_decimal(literal)
    };
    parsed.unwrap_or(Decimal::ZERO)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_decimal(&json!(12)), dec!(12));
        assert_eq!(coerce_decimal(&json!(0.1)), dec!(0.1));
        assert_eq!(coerce_decimal(&json!(-4.25)), dec!(-4.25));
    }

    #[test]
    fn garbage_becomes_zero() {
        assert_eq!(coerce_decimal(&json!("abc")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!([1, 2])), Decimal::ZERO);
        assert_eq!(coerce_optional(None), Decimal::ZERO);
    }

    #[test]
    fn strings_use_numeric_prefix() {
        assert_eq!(parse_float_prefix("  42"), dec!(42));
        assert_eq!(parse_float_prefix("12abc"), dec!(12));
        assert_eq!(parse_float_prefix("3.5kg"), dec!(3.5));
        assert_eq!(parse_float_prefix(".5"), dec!(0.5));
        assert_eq!(parse_float_prefix("5."), dec!(5));
        assert_eq!(parse_float_prefix("-7"), dec!(-7));
        assert_eq!(parse_float_prefix("1e3"), dec!(1000));
        assert_eq!(parse_float_prefix("2e"), dec!(2));
        assert_eq!(parse_float_prefix("-"), Decimal::ZERO);
        assert_eq!(parse_float_prefix("."), Decimal::ZERO);
    }

    #[test]
    fn out_of_range_strings_become_zero() {
        assert_eq!(parse_float_prefix("1e40"), Decimal::ZERO);
    }

    #[test]
    fn flags() {
        assert!(coerce_flag(None, true));
        assert!(!coerce_flag(None, false));
        assert!(coerce_flag(Some(&json!(true)), false));
        assert!(coerce_flag(Some(&json!("yes")), false));
        assert!(coerce_flag(Some(&json!(1)), false));
        assert!(!coerce_flag(Some(&json!(0)), true));
        assert!(!coerce_flag(Some(&json!("no")), true));
    }
}
