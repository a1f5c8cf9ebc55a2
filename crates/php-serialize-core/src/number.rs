//! Numeric key classification, deterministic key ordering, and canonical
//! decimal rendering for the wire format.

use std::cmp::Ordering;

use crate::types::PhpKey;

/// Return the numeric value of a key, if it has one.
///
/// Integer and float keys are numeric; string keys are not, even when their
/// text happens to look like a number.
#[inline]
pub fn numeric_value(key: &PhpKey<'_>) -> Option<f64> {
    match key {
        PhpKey::Int(i) => Some(*i as f64),
        PhpKey::Float(f) => Some(*f),
        PhpKey::String(_) => None,
    }
}

/// Deterministic ordering for map keys at encode time.
///
/// Numeric keys always sort before string keys. Among themselves, numeric
/// keys order ascending by value and string keys order ascending by bytes.
/// NaN keys use IEEE total ordering so the sort stays total.
pub fn key_order(a: &PhpKey<'_>, b: &PhpKey<'_>) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        // Both keys are strings when neither classifies as numeric.
        (None, None) => a.as_bytes().cmp(&b.as_bytes()),
    }
}

/// Render an integer to its wire text: plain base-10, no grouping.
#[inline]
pub fn canonical_int_text(value: i64) -> String {
    value.to_string()
}

/// Render a float to its wire text.
///
/// Finite values use the shortest decimal form that round-trips to the same
/// bits, with no exponent notation. Non-finite values use PHP's spellings.
pub fn canonical_float_text(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "INF".to_string()
        } else {
            "-INF".to_string()
        }
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn s(key: &str) -> PhpKey<'_> {
        PhpKey::String(Cow::Borrowed(key.as_bytes()))
    }

    #[test]
    fn numeric_classification() {
        assert_eq!(numeric_value(&PhpKey::Int(-3)), Some(-3.0));
        assert_eq!(numeric_value(&PhpKey::Float(1.5)), Some(1.5));
        assert_eq!(numeric_value(&s("42")), None);
    }

    #[test]
    fn numeric_keys_sort_by_value() {
        assert_eq!(key_order(&PhpKey::Int(2), &PhpKey::Int(10)), Ordering::Less);
        assert_eq!(
            key_order(&PhpKey::Float(1.5), &PhpKey::Int(1)),
            Ordering::Greater
        );
        assert_eq!(
            key_order(&PhpKey::Int(0), &PhpKey::Float(0.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn numeric_keys_sort_before_string_keys() {
        assert_eq!(key_order(&PhpKey::Int(999), &s("0")), Ordering::Less);
        assert_eq!(key_order(&s("0"), &PhpKey::Int(999)), Ordering::Greater);
    }

    #[test]
    fn string_keys_sort_ascending_bytewise() {
        assert_eq!(key_order(&s("a"), &s("b")), Ordering::Less);
        assert_eq!(key_order(&s("b"), &s("a")), Ordering::Greater);
        assert_eq!(key_order(&s("a"), &s("ab")), Ordering::Less);
    }

    #[test]
    fn int_text_is_plain_decimal() {
        assert_eq!(canonical_int_text(0), "0");
        assert_eq!(canonical_int_text(-42), "-42");
        assert_eq!(canonical_int_text(i64::MAX), "9223372036854775807");
        assert_eq!(canonical_int_text(i64::MIN), "-9223372036854775808");
    }

    #[test]
    fn float_text_is_shortest_roundtrip() {
        assert_eq!(canonical_float_text(3.5), "3.5");
        assert_eq!(canonical_float_text(0.1), "0.1");
        assert_eq!(canonical_float_text(-2.5), "-2.5");
        assert_eq!(canonical_float_text(100.0), "100");
    }

    #[test]
    fn float_text_special_values() {
        assert_eq!(canonical_float_text(f64::INFINITY), "INF");
        assert_eq!(canonical_float_text(f64::NEG_INFINITY), "-INF");
        assert_eq!(canonical_float_text(f64::NAN), "NAN");
    }
}
