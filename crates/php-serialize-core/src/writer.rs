//! Encoder for PHP's serialize format.
//!
//! The encoder walks a [`PhpValue`] tree and emits the byte-exact wire form:
//! every string is length-prefixed with its raw byte count, lists get their
//! positional integer keys back, and map pairs are sorted so the same map
//! always produces the same bytes regardless of how it was built.
//!
//! Key order is: numeric keys first, ascending by value, then string keys in
//! ascending byte-wise order (see [`crate::number::key_order`]).

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

use crate::error::Result;
use crate::number::{canonical_float_text, canonical_int_text, key_order};
use crate::types::{PhpKey, PhpValue};

/// Encode a value to its PHP serialized byte form.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{to_bytes, PhpValue};
///
/// let bytes = to_bytes(&PhpValue::Int(42)).unwrap();
/// assert_eq!(bytes, b"i:42;");
/// ```
#[cfg_attr(feature = "tracing", instrument(skip(value), fields(value_type = value.type_name())))]
pub fn to_bytes(value: &PhpValue<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(value, &mut out)?;

    #[cfg(feature = "tracing")]
    debug!(output_len = out.len(), "Encode completed");

    Ok(out)
}

/// Emit one value, recursing into containers.
fn write_value(value: &PhpValue<'_>, out: &mut Vec<u8>) -> Result<()> {
    match value {
        PhpValue::Null => out.extend_from_slice(b"N;"),
        PhpValue::Bool(true) => out.extend_from_slice(b"b:1;"),
        PhpValue::Bool(false) => out.extend_from_slice(b"b:0;"),
        PhpValue::Int(i) => {
            out.extend_from_slice(b"i:");
            out.extend_from_slice(canonical_int_text(*i).as_bytes());
            out.push(b';');
        }
        PhpValue::Float(f) => {
            out.extend_from_slice(b"d:");
            out.extend_from_slice(canonical_float_text(*f).as_bytes());
            out.push(b';');
        }
        PhpValue::String(s) => write_string(s, out),
        PhpValue::List(items) => {
            write_array_header(items.len(), out);
            for (index, item) in items.iter().enumerate() {
                out.extend_from_slice(b"i:");
                out.extend_from_slice(canonical_int_text(index as i64).as_bytes());
                out.push(b';');
                write_value(item, out)?;
            }
            out.push(b'}');
        }
        PhpValue::Map(pairs) => {
            write_array_header(pairs.len(), out);
            // Sort on borrowed pairs; the value itself stays untouched
            let mut sorted: Vec<&(PhpKey<'_>, PhpValue<'_>)> = pairs.iter().collect();
            sorted.sort_by(|a, b| key_order(&a.0, &b.0));
            for (key, item) in sorted.iter().map(|pair| (&pair.0, &pair.1)) {
                write_key(key, out);
                write_value(item, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

/// Emit a map key in its wire form.
fn write_key(key: &PhpKey<'_>, out: &mut Vec<u8>) {
    match key {
        PhpKey::Int(i) => {
            out.extend_from_slice(b"i:");
            out.extend_from_slice(canonical_int_text(*i).as_bytes());
            out.push(b';');
        }
        PhpKey::Float(f) => {
            out.extend_from_slice(b"d:");
            out.extend_from_slice(canonical_float_text(*f).as_bytes());
            out.push(b';');
        }
        PhpKey::String(s) => write_string(s, out),
    }
}

/// Emit `s:<len>:"<bytes>";`. The length counts raw bytes, not characters.
fn write_string(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(b"s:");
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.extend_from_slice(b":\"");
    out.extend_from_slice(bytes);
    out.extend_from_slice(b"\";");
}

/// Emit `a:<count>:{`.
fn write_array_header(count: usize, out: &mut Vec<u8>) {
    out.extend_from_slice(b"a:");
    out.extend_from_slice(count.to_string().as_bytes());
    out.extend_from_slice(b":{");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::from_bytes;
    use std::borrow::Cow;

    fn map<'a>(pairs: Vec<(PhpKey<'a>, PhpValue<'a>)>) -> PhpValue<'a> {
        PhpValue::Map(pairs)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(to_bytes(&PhpValue::Null).unwrap(), b"N;");
        assert_eq!(to_bytes(&PhpValue::Bool(true)).unwrap(), b"b:1;");
        assert_eq!(to_bytes(&PhpValue::Bool(false)).unwrap(), b"b:0;");
        assert_eq!(to_bytes(&PhpValue::Int(42)).unwrap(), b"i:42;");
        assert_eq!(to_bytes(&PhpValue::Int(-123)).unwrap(), b"i:-123;");
        assert_eq!(
            to_bytes(&PhpValue::Int(i64::MIN)).unwrap(),
            b"i:-9223372036854775808;"
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(to_bytes(&PhpValue::Float(3.5)).unwrap(), b"d:3.5;");
        assert_eq!(to_bytes(&PhpValue::Float(-2.5)).unwrap(), b"d:-2.5;");
        // Whole floats drop the fraction but keep the d tag
        assert_eq!(to_bytes(&PhpValue::Float(100.0)).unwrap(), b"d:100;");
        assert_eq!(
            to_bytes(&PhpValue::Float(f64::INFINITY)).unwrap(),
            b"d:INF;"
        );
        assert_eq!(
            to_bytes(&PhpValue::Float(f64::NEG_INFINITY)).unwrap(),
            b"d:-INF;"
        );
        assert_eq!(to_bytes(&PhpValue::Float(f64::NAN)).unwrap(), b"d:NAN;");
    }

    #[test]
    fn test_strings() {
        assert_eq!(to_bytes(&PhpValue::from("")).unwrap(), b"s:0:\"\";");
        assert_eq!(
            to_bytes(&PhpValue::from("hello")).unwrap(),
            b"s:5:\"hello\";"
        );
    }

    #[test]
    fn test_string_length_counts_bytes_not_chars() {
        // "한글" = 2 characters, 6 bytes
        assert_eq!(
            to_bytes(&PhpValue::from("한글")).unwrap(),
            "s:6:\"한글\";".as_bytes()
        );
    }

    #[test]
    fn test_binary_string() {
        let v = PhpValue::String(Cow::Borrowed(b"a\x00b".as_slice()));
        assert_eq!(to_bytes(&v).unwrap(), b"s:3:\"a\x00b\";");
    }

    #[test]
    fn test_list_gets_positional_keys() {
        let v = PhpValue::List(vec![
            PhpValue::from("foo"),
            PhpValue::from("bar"),
        ]);
        assert_eq!(
            to_bytes(&v).unwrap(),
            br#"a:2:{i:0;s:3:"foo";i:1;s:3:"bar";}"#
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(to_bytes(&PhpValue::List(vec![])).unwrap(), b"a:0:{}");
        assert_eq!(to_bytes(&map(vec![])).unwrap(), b"a:0:{}");
    }

    #[test]
    fn test_map_matches_php_fixture() {
        // PHP: serialize(['a' => 1, 'b' => 2])
        let v = map(vec![
            (PhpKey::from("a"), PhpValue::Int(1)),
            (PhpKey::from("b"), PhpValue::Int(2)),
        ]);
        assert_eq!(to_bytes(&v).unwrap(), br#"a:2:{s:1:"a";i:1;s:1:"b";i:2;}"#);
    }

    #[test]
    fn test_map_string_keys_sorted_ascending() {
        let v = map(vec![
            (PhpKey::from("b"), PhpValue::Int(2)),
            (PhpKey::from("a"), PhpValue::Int(1)),
        ]);
        assert_eq!(to_bytes(&v).unwrap(), br#"a:2:{s:1:"a";i:1;s:1:"b";i:2;}"#);
    }

    #[test]
    fn test_map_numeric_keys_before_string_keys() {
        let v = map(vec![
            (PhpKey::from("b"), PhpValue::Int(5)),
            (PhpKey::Int(10), PhpValue::Int(3)),
            (PhpKey::from("a"), PhpValue::Int(4)),
            (PhpKey::Int(2), PhpValue::Int(2)),
            (PhpKey::Float(1.5), PhpValue::Int(1)),
        ]);
        assert_eq!(
            to_bytes(&v).unwrap(),
            br#"a:5:{d:1.5;i:1;i:2;i:2;i:10;i:3;s:1:"a";i:4;s:1:"b";i:5;}"#
        );
    }

    #[test]
    fn test_map_emission_is_order_insensitive() {
        let forward = map(vec![
            (PhpKey::from("x"), PhpValue::Int(1)),
            (PhpKey::from("y"), PhpValue::Int(2)),
            (PhpKey::Int(3), PhpValue::Int(3)),
        ]);
        let backward = map(vec![
            (PhpKey::Int(3), PhpValue::Int(3)),
            (PhpKey::from("y"), PhpValue::Int(2)),
            (PhpKey::from("x"), PhpValue::Int(1)),
        ]);
        assert_eq!(to_bytes(&forward).unwrap(), to_bytes(&backward).unwrap());
    }

    #[test]
    fn test_nested_containers() {
        let v = map(vec![(
            PhpKey::from("user"),
            PhpValue::List(vec![PhpValue::from("Alice"), PhpValue::Int(30)]),
        )]);
        assert_eq!(
            to_bytes(&v).unwrap(),
            br#"a:1:{s:4:"user";a:2:{i:0;s:5:"Alice";i:1;i:30;}}"#
        );
    }

    #[test]
    fn test_roundtrip_list_stays_list() {
        let v = PhpValue::List(vec![
            PhpValue::Int(1),
            PhpValue::from("two"),
            PhpValue::Null,
        ]);
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn test_roundtrip_map_stays_map() {
        let v = map(vec![
            (PhpKey::from("age"), PhpValue::Int(30)),
            (PhpKey::from("name"), PhpValue::from("Alice")),
        ]);
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn test_roundtrip_multibyte_string() {
        let v = PhpValue::from("héllo wörld");
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), v);
    }
}
