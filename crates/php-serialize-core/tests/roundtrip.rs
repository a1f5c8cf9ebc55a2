//! Property-based round-trip tests.
//!
//! Generates random value trees and checks that `from_bytes(to_bytes(v))`
//! reproduces `v`, content and shape. Generation notes:
//!
//! - Floats are finite only (NaN never compares equal to itself).
//! - Maps are non-empty: an empty wire array carries no key information, so
//!   `a:0:{}` always decodes as an empty list.
//! - Map pairs are built in sorted key order so pair-order equality holds
//!   after the encoder's deterministic sort.

use proptest::prelude::*;

use php_serialize_core::{from_bytes, to_bytes, PhpKey, PhpValue};

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        // Delimiters of the wire grammar are fine inside strings
        prop::string::string_regex("[a-z:;\"{}]{0,12}").unwrap(),
        Just(String::new()),
        // Multi-byte text: length fields must count bytes
        Just("caf\u{00e9}".to_string()),
        Just("\u{d55c}\u{ae00}".to_string()),
        Just("\u{4f60}\u{597d}".to_string()),
        // Numeric-looking text stays a string key, never an integer
        Just("42".to_string()),
        Just("-1".to_string()),
    ]
}

fn arb_finite_float() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("must be finite", |f| f.is_finite())
}

fn arb_leaf() -> impl Strategy<Value = PhpValue<'static>> {
    prop_oneof![
        Just(PhpValue::Null),
        any::<bool>().prop_map(PhpValue::Bool),
        any::<i64>().prop_map(PhpValue::Int),
        arb_finite_float().prop_map(PhpValue::Float),
        arb_string().prop_map(PhpValue::from),
    ]
}

fn arb_value(depth: u32) -> BoxedStrategy<PhpValue<'static>> {
    if depth == 0 {
        arb_leaf().boxed()
    } else {
        prop_oneof![
            4 => arb_leaf(),
            2 => prop::collection::vec(arb_value(depth - 1), 0..4).prop_map(PhpValue::List),
            2 => prop::collection::btree_map(arb_string(), arb_value(depth - 1), 1..4)
                .prop_map(|map| {
                    PhpValue::Map(
                        map.into_iter()
                            .map(|(k, v)| (PhpKey::from(k), v))
                            .collect(),
                    )
                }),
        ]
        .boxed()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn roundtrip_preserves_value(value in arb_value(3)) {
        let bytes = to_bytes(&value).unwrap();
        let decoded = from_bytes(&bytes).unwrap();
        prop_assert_eq!(
            &decoded,
            &value,
            "round-trip failed for wire form {:?}",
            String::from_utf8_lossy(&bytes)
        );
    }

    #[test]
    fn encoding_is_stable_across_a_roundtrip(value in arb_value(3)) {
        let first = to_bytes(&value).unwrap();
        let decoded = from_bytes(&first).unwrap();
        let second = to_bytes(&decoded).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn string_length_field_counts_bytes(s in arb_string()) {
        let bytes = to_bytes(&PhpValue::from(s.clone())).unwrap();
        let expected_prefix = format!("s:{}:\"", s.len());
        prop_assert!(bytes.starts_with(expected_prefix.as_bytes()));
    }

    #[test]
    fn lists_stay_lists(items in prop::collection::vec(arb_leaf(), 0..8)) {
        let value = PhpValue::List(items);
        let decoded = from_bytes(&to_bytes(&value).unwrap()).unwrap().into_owned();
        prop_assert!(decoded.is_list());
    }

    #[test]
    fn maps_with_string_keys_stay_maps(
        pairs in prop::collection::btree_map(arb_string(), arb_leaf(), 1..8)
    ) {
        let value = PhpValue::Map(
            pairs.into_iter().map(|(k, v)| (PhpKey::from(k), v)).collect(),
        );
        let decoded = from_bytes(&to_bytes(&value).unwrap()).unwrap().into_owned();
        prop_assert!(decoded.is_map());
    }

    #[test]
    fn decode_never_panics_on_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = from_bytes(&data);
    }
}
