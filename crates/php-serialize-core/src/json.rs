//! JSON bridging for PHP values.
//!
//! Converts [`PhpValue`] trees to `serde_json::Value` and back, and exposes
//! [`from_serialize`], the adapter that lets any `serde::Serialize` type —
//! structs included — enter the encoder as a map. Enable the `serde` feature
//! to use this module.

use std::borrow::Cow;

use serde_json::{json, Map, Value as JsonValue};

use crate::error::{PhpCodecError, Result};
use crate::types::{PhpKey, PhpValue};

/// Convert a PHP value to a JSON value.
///
/// # Mapping Rules
///
/// | PHP shape | JSON type |
/// |-----------|-----------|
/// | `Null` | `null` |
/// | `Bool` | `boolean` |
/// | `Int` | `number` |
/// | `Float` | `number` (`null` for NaN, strings for infinities) |
/// | `String` | `string` (lossy UTF-8 conversion) |
/// | `List` | `array` |
/// | `Map` | `object` |
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{from_bytes, to_json};
///
/// let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
/// let value = from_bytes(data).unwrap();
/// let json = to_json(&value);
/// assert_eq!(json, serde_json::json!({"name": "Alice", "age": 30}));
/// ```
pub fn to_json(value: &PhpValue) -> JsonValue {
    match value {
        PhpValue::Null => JsonValue::Null,
        PhpValue::Bool(b) => JsonValue::Bool(*b),
        PhpValue::Int(i) => json!(*i),
        PhpValue::Float(f) => {
            if f.is_nan() {
                JsonValue::Null
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    json!("Infinity")
                } else {
                    json!("-Infinity")
                }
            } else {
                json!(*f)
            }
        }
        PhpValue::String(s) => {
            let string = String::from_utf8_lossy(s);
            JsonValue::String(string.into_owned())
        }
        PhpValue::List(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        PhpValue::Map(pairs) => {
            let mut map = Map::new();
            for (k, v) in pairs {
                map.insert(k.text().into_owned(), to_json(v));
            }
            JsonValue::Object(map)
        }
    }
}

/// Convert a JSON value to a PHP value.
///
/// JSON objects become maps in their original key order (the encoder sorts
/// at emission anyway), arrays become lists. Integers outside the `i64`
/// range cannot be represented and fail with
/// [`ErrorKind::UnsupportedValue`](crate::ErrorKind::UnsupportedValue).
pub fn from_json(value: &JsonValue) -> Result<PhpValue<'static>> {
    Ok(match value {
        JsonValue::Null => PhpValue::Null,
        JsonValue::Bool(b) => PhpValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                PhpValue::Int(i)
            } else if n.is_u64() {
                return Err(PhpCodecError::unsupported_value(format!(
                    "integer {} does not fit in 64-bit signed range",
                    n
                )));
            } else if let Some(f) = n.as_f64() {
                PhpValue::Float(f)
            } else {
                return Err(PhpCodecError::unsupported_value(format!(
                    "unrepresentable number {}",
                    n
                )));
            }
        }
        JsonValue::String(s) => PhpValue::String(Cow::Owned(s.clone().into_bytes())),
        JsonValue::Array(items) => {
            PhpValue::List(items.iter().map(from_json).collect::<Result<_>>()?)
        }
        JsonValue::Object(map) => PhpValue::Map(
            map.iter()
                .map(|(k, v)| {
                    Ok((
                        PhpKey::String(Cow::Owned(k.clone().into_bytes())),
                        from_json(v)?,
                    ))
                })
                .collect::<Result<_>>()?,
        ),
    })
}

/// Encode any `Serialize` type to PHP serialized bytes.
///
/// Struct-like values enter as maps: the serialized field name is the key,
/// so `#[serde(rename = "...")]` overrides a field's wire name and
/// `#[serde(skip)]` leaves a field out entirely.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::json::from_serialize;
///
/// #[derive(serde::Serialize)]
/// struct User {
///     name: &'static str,
///     age: u32,
/// }
///
/// let bytes = from_serialize(&User { name: "Alice", age: 30 }).unwrap();
/// assert_eq!(bytes, br#"a:2:{s:3:"age";i:30;s:4:"name";s:5:"Alice";}"#);
/// ```
pub fn from_serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_value(value)
        .map_err(|e| PhpCodecError::unsupported_value(e.to_string()))?;
    let php = from_json(&json)?;
    crate::writer::to_bytes(&php)
}

/// Convert a PHP value to a JSON string.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{from_bytes, json::to_json_string};
///
/// let data = br#"a:1:{s:4:"name";s:5:"Alice";}"#;
/// let value = from_bytes(data).unwrap();
/// assert_eq!(to_json_string(&value).unwrap(), r#"{"name":"Alice"}"#);
/// ```
pub fn to_json_string(value: &PhpValue) -> serde_json::Result<String> {
    let json = to_json(value);
    serde_json::to_string(&json)
}

/// Convert a PHP value to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &PhpValue) -> serde_json::Result<String> {
    let json = to_json(value);
    serde_json::to_string_pretty(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::from_bytes;
    use crate::ErrorKind;

    #[test]
    fn test_simple_types() {
        assert_eq!(to_json(&PhpValue::Null), JsonValue::Null);
        assert_eq!(to_json(&PhpValue::Bool(true)), JsonValue::Bool(true));
        assert_eq!(to_json(&PhpValue::Int(42)), json!(42));
        assert_eq!(to_json(&PhpValue::Float(3.5)), json!(3.5));
    }

    #[test]
    fn test_list_to_array() {
        let value = from_bytes(b"a:2:{i:0;s:3:\"foo\";i:1;s:3:\"bar\";}").unwrap();
        assert_eq!(to_json(&value), json!(["foo", "bar"]));
    }

    #[test]
    fn test_map_to_object() {
        let value = from_bytes(b"a:2:{s:4:\"name\";s:5:\"Alice\";s:3:\"age\";i:30;}").unwrap();
        assert_eq!(to_json(&value), json!({"name": "Alice", "age": 30}));
    }

    #[test]
    fn test_sparse_keys_to_object() {
        let value = from_bytes(b"a:2:{i:0;s:3:\"foo\";i:5;s:3:\"bar\";}").unwrap();
        assert_eq!(to_json(&value), json!({"0": "foo", "5": "bar"}));
    }

    #[test]
    fn test_nested() {
        let value =
            from_bytes(b"a:1:{s:4:\"user\";a:2:{s:4:\"name\";s:5:\"Alice\";s:3:\"age\";i:30;}}")
                .unwrap();
        assert_eq!(to_json(&value), json!({"user": {"name": "Alice", "age": 30}}));
    }

    #[test]
    fn test_from_json_roundtrip() {
        let json = json!({"items": [1, 2.5, "x", null], "ok": true});
        let php = from_json(&json).unwrap();
        assert_eq!(to_json(&php), json);
    }

    #[test]
    fn test_from_json_rejects_huge_u64() {
        let json = json!(u64::MAX);
        let err = from_json(&json).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnsupportedValue(_)));
    }

    #[test]
    fn test_from_serialize_struct_fields() {
        #[derive(serde::Serialize)]
        struct Account {
            name: &'static str,
            #[serde(rename = "years")]
            age: u32,
            #[serde(skip)]
            _secret: &'static str,
        }

        let bytes = from_serialize(&Account {
            name: "Alice",
            age: 30,
            _secret: "hidden",
        })
        .unwrap();
        // Keys emit sorted: "name" < "years"; the skipped field never appears
        assert_eq!(
            bytes,
            br#"a:2:{s:4:"name";s:5:"Alice";s:5:"years";i:30;}"#
        );
    }

    #[test]
    fn test_from_serialize_sequence() {
        let bytes = from_serialize(&vec![1, 2, 3]).unwrap();
        assert_eq!(bytes, b"a:3:{i:0;i:1;i:1;i:2;i:2;i:3;}");
    }
}
