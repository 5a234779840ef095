//! Best-effort field extraction for vendor payloads.
//!
//! Venue responses are loosely typed: numbers arrive as JSON strings or as
//! JSON numbers depending on the endpoint, and fields go missing. These
//! helpers never fail. A field that cannot be read degrades to its zero
//! value and a `warn!` is emitted, so one bad field never sinks a whole
//! response.

use serde_json::Value;
use tracing::warn;

use crate::traits::Unit;

static NULL: Value = Value::Null;

/// Parses a string or number into `f64`, falling back to 0.0.
pub fn number(value: &Value, field: &str) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_else(|| {
            warn!("Failed to read {} as f64: {}", field, n);
            0.0
        }),
        Value::String(s) => parse_f64_or_warn(s, field),
        Value::Null => {
            warn!("Missing numeric field {}", field);
            0.0
        }
        other => {
            warn!("Unexpected type for {}: {}", field, other);
            0.0
        }
    }
}

/// Parse a decimal string, logging and returning 0.0 on failure.
pub fn parse_f64_or_warn(s: &str, field: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or_else(|e| {
        warn!("Failed to parse {} '{}': {}", field, s, e);
        0.0
    })
}

/// Reads a string, rendering numbers and booleans as text. Missing or
/// structured values become an empty string.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Elements of an array, or nothing.
pub fn array(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// One book level given either as `[price, amount, ...]` or as an object
/// with the named keys.
pub fn unit(level: &Value, price_key: &str, amount_key: &str) -> Unit {
    match level {
        Value::Array(items) => Unit::new(
            number(items.first().unwrap_or(&NULL), price_key),
            number(items.get(1).unwrap_or(&NULL), amount_key),
        ),
        _ => Unit::new(
            number(&level[price_key], price_key),
            number(&level[amount_key], amount_key),
        ),
    }
}

/// All levels of one side of a book.
pub fn units(levels: &Value, price_key: &str, amount_key: &str) -> Vec<Unit> {
    array(levels)
        .iter()
        .map(|level| unit(level, price_key, amount_key))
        .collect()
}

/// Shortest round-trip decimal rendering, never in exponent form.
pub fn format_decimal(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_strings_and_numbers() {
        assert_eq!(number(&json!("9000.5"), "price"), 9000.5);
        assert_eq!(number(&json!(42), "price"), 42.0);
        assert_eq!(number(&json!(" 1.25 "), "price"), 1.25);
    }

    #[test]
    fn test_number_degrades_to_zero() {
        assert_eq!(number(&json!("abc"), "price"), 0.0);
        assert_eq!(number(&Value::Null, "price"), 0.0);
        assert_eq!(number(&json!({"x": 1}), "price"), 0.0);
    }

    #[test]
    fn test_text() {
        assert_eq!(text(&json!("open")), "open");
        assert_eq!(text(&json!(12345)), "12345");
        assert_eq!(text(&json!(true)), "true");
        assert_eq!(text(&Value::Null), "");
    }

    #[test]
    fn test_unit_from_array_and_object() {
        assert_eq!(unit(&json!(["100", 2]), "price", "amount"), Unit::new(100.0, 2.0));
        assert_eq!(
            unit(&json!({"price": "1.5", "size": "3"}), "price", "size"),
            Unit::new(1.5, 3.0)
        );
        assert_eq!(unit(&json!([]), "price", "amount"), Unit::new(0.0, 0.0));
    }

    #[test]
    fn test_units_on_non_array() {
        assert!(units(&Value::Null, "price", "amount").is_empty());
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.5), "0.5");
        assert_eq!(format_decimal(100.0), "100");
        assert_eq!(format_decimal(0.00000012), "0.00000012");
    }
}
