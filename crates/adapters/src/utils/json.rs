//! Lenient field access over `serde_json::Value`
//!
//! Venue payloads mix quoted and bare numbers and omit fields freely, so every
//! accessor returns `Option` rather than failing.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

pub fn safe_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn safe_bool(value: &Value, key: &str) -> Option<bool> {
    value.get(key)?.as_bool()
}

pub fn safe_integer(value: &Value, key: &str) -> Option<u32> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn safe_decimal(value: &Value, key: &str) -> Option<Decimal> {
    value.get(key).and_then(|v| to_decimal(v, key))
}

/// Converts a quoted or bare JSON number, logging anything unparsable
pub fn to_decimal(value: &Value, field_name: &str) -> Option<Decimal> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| warn!("Failed to parse {} '{}': {}", field_name, raw, e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_from_string_and_number() {
        let v = json!({"a": "1.0000000", "b": 4, "c": "1e-7", "d": "abc", "e": ""});
        assert_eq!(safe_decimal(&v, "a"), Some(Decimal::from_str("1.0000000").unwrap()));
        assert_eq!(safe_decimal(&v, "b"), Some(Decimal::from(4)));
        assert_eq!(safe_decimal(&v, "c"), Some(Decimal::from_str("0.0000001").unwrap()));
        assert_eq!(safe_decimal(&v, "d"), None);
        assert_eq!(safe_decimal(&v, "e"), None);
        assert_eq!(safe_decimal(&v, "missing"), None);
    }

    #[test]
    fn test_integer_and_string() {
        let v = json!({"p": 4, "q": "7", "s": "XLM/native", "n": null});
        assert_eq!(safe_integer(&v, "p"), Some(4));
        assert_eq!(safe_integer(&v, "q"), Some(7));
        assert_eq!(safe_string(&v, "s").as_deref(), Some("XLM/native"));
        assert_eq!(safe_string(&v, "p").as_deref(), Some("4"));
        assert_eq!(safe_string(&v, "n"), None);
    }
}
