//! Lenient numeric coercion for planner-produced JSON.
//!
//! The chat planner is a language model; it emits `"649cc"`, `"120 mph"` or
//! `"8,000"` as often as bare numbers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d+(?:\.\d+)?").unwrap_or_else(|e| unreachable!("static regex: {e}"))
});

/// Extract the first number from a string, ignoring thousands separators.
#[must_use]
pub fn parse_numeric_str(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Numbers pass through; numeric-looking strings are parsed; anything else is `None`.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_number, parse_numeric_str};
    use serde_json::json;

    #[test]
    fn parses_units_and_separators() {
        assert_eq!(parse_numeric_str("649cc"), Some(649.0));
        assert_eq!(parse_numeric_str("approx 120 mph"), Some(120.0));
        assert_eq!(parse_numeric_str("8,000"), Some(8000.0));
        assert_eq!(parse_numeric_str("3.9 s"), Some(3.9));
        assert_eq!(parse_numeric_str("unknown"), None);
    }

    #[test]
    fn coerces_json_values() {
        assert_eq!(coerce_number(&json!(400)), Some(400.0));
        assert_eq!(coerce_number(&json!("399 cc")), Some(399.0));
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
    }
}
