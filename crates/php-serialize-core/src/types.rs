//! PHP value types.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use bstr::BStr;

/// A value that can travel through the PHP serialize format.
///
/// Wire arrays carry ordered key/value pairs. On decode they are split into
/// two shapes: [`PhpValue::List`] when the keys were exactly the positional
/// indices `0..n-1` in order, and [`PhpValue::Map`] otherwise. Objects decode
/// to the same two shapes; their class name is discarded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PhpValue<'a> {
    /// PHP null value.
    #[default]
    Null,

    /// PHP boolean value.
    Bool(bool),

    /// PHP integer value.
    Int(i64),

    /// PHP float/double value.
    Float(f64),

    /// PHP string value (may contain non-UTF8 bytes).
    /// Uses Cow for zero-copy when possible.
    String(Cow<'a, [u8]>),

    /// A wire array whose keys were the positional indices `0..n-1`.
    /// Keys are implicit; encoding emits them back as `i:0;` .. `i:n-1;`.
    List(Vec<PhpValue<'a>>),

    /// A wire array with any other key shape, in insertion order.
    /// Encoding sorts the pairs by key, numeric keys first.
    Map(Vec<(PhpKey<'a>, PhpValue<'a>)>),
}

/// An array key.
///
/// The decoder only ever produces [`PhpKey::String`]: numeric wire keys are
/// canonicalised to their decimal text. The numeric variants exist for
/// encoder callers that build maps keyed by numbers, and drive the
/// numeric-before-string ordering of emitted pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpKey<'a> {
    /// Integer key.
    Int(i64),
    /// Float key.
    Float(f64),
    /// String key (may contain non-UTF8 bytes).
    String(Cow<'a, [u8]>),
}

impl<'a> PhpValue<'a> {
    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PhpValue::Null)
    }

    /// Check if the value is a boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, PhpValue::Bool(_))
    }

    /// Check if the value is an integer.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, PhpValue::Int(_))
    }

    /// Check if the value is a float.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, PhpValue::Float(_))
    }

    /// Check if the value is a string.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, PhpValue::String(_))
    }

    /// Check if the value is a positionally-indexed list.
    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, PhpValue::List(_))
    }

    /// Check if the value is a keyed map.
    #[inline]
    pub fn is_map(&self) -> bool {
        matches!(self, PhpValue::Map(_))
    }

    /// Get the value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PhpValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PhpValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float. Integers widen.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PhpValue::Float(f) => Some(*f),
            PhpValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PhpValue::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Get the value as a UTF-8 string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::String(s) => std::str::from_utf8(s.as_ref()).ok(),
            _ => None,
        }
    }

    /// Get the value as a list slice.
    #[inline]
    pub fn as_list(&self) -> Option<&[PhpValue<'a>]> {
        match self {
            PhpValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Get the value as a slice of key/value pairs.
    #[inline]
    pub fn as_map(&self) -> Option<&[(PhpKey<'a>, PhpValue<'a>)]> {
        match self {
            PhpValue::Map(pairs) => Some(pairs.as_slice()),
            _ => None,
        }
    }

    /// Look up a map entry by key text.
    ///
    /// Numeric keys match their canonical decimal rendering, so `get("5")`
    /// finds both `PhpKey::Int(5)` and a `"5"` string key.
    pub fn get(&self, key: &str) -> Option<&PhpValue<'a>> {
        let pairs = self.as_map()?;
        pairs
            .iter()
            .find(|(k, _)| k.text() == key)
            .map(|(_, v)| v)
    }

    /// Collect a map into a `HashMap` keyed by lossy UTF-8 key text.
    pub fn to_string_map(&self) -> Option<HashMap<String, &PhpValue<'a>>> {
        let pairs = self.as_map()?;
        let mut map = HashMap::with_capacity(pairs.len());
        for (k, v) in pairs {
            map.insert(k.text().into_owned(), v);
        }
        Some(map)
    }

    /// Convert to an owned value that doesn't borrow from the input.
    pub fn into_owned(self) -> PhpValue<'static> {
        match self {
            PhpValue::Null => PhpValue::Null,
            PhpValue::Bool(b) => PhpValue::Bool(b),
            PhpValue::Int(i) => PhpValue::Int(i),
            PhpValue::Float(f) => PhpValue::Float(f),
            PhpValue::String(s) => PhpValue::String(Cow::Owned(s.into_owned())),
            PhpValue::List(items) => {
                PhpValue::List(items.into_iter().map(PhpValue::into_owned).collect())
            }
            PhpValue::Map(pairs) => PhpValue::Map(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            ),
        }
    }

    /// Get a type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PhpValue::Null => "null",
            PhpValue::Bool(_) => "boolean",
            PhpValue::Int(_) => "integer",
            PhpValue::Float(_) => "float",
            PhpValue::String(_) => "string",
            PhpValue::List(_) => "list",
            PhpValue::Map(_) => "map",
        }
    }
}

impl<'a> PhpKey<'a> {
    /// The key's text form: decimal rendering for numeric keys, lossy UTF-8
    /// for string keys.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            PhpKey::Int(i) => Cow::Owned(i.to_string()),
            PhpKey::Float(f) => Cow::Owned(crate::number::canonical_float_text(*f)),
            PhpKey::String(s) => String::from_utf8_lossy(s.as_ref()),
        }
    }

    /// Get the key as a byte slice, if it is a string key.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PhpKey::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Get the key as a UTF-8 string, if it is a string key.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpKey::String(s) => std::str::from_utf8(s.as_ref()).ok(),
            _ => None,
        }
    }

    /// Convert to an owned key that doesn't borrow from the input.
    pub fn into_owned(self) -> PhpKey<'static> {
        match self {
            PhpKey::Int(i) => PhpKey::Int(i),
            PhpKey::Float(f) => PhpKey::Float(f),
            PhpKey::String(s) => PhpKey::String(Cow::Owned(s.into_owned())),
        }
    }
}

impl fmt::Display for PhpValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpValue::Null => write!(f, "null"),
            PhpValue::Bool(b) => write!(f, "{}", b),
            PhpValue::Int(i) => write!(f, "{}", i),
            PhpValue::Float(fl) => write!(f, "{}", fl),
            PhpValue::String(s) => write!(f, "\"{}\"", BStr::new(s.as_ref())),
            PhpValue::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            PhpValue::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for PhpKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpKey::Int(i) => write!(f, "{}", i),
            PhpKey::Float(fl) => write!(f, "{}", fl),
            PhpKey::String(s) => write!(f, "\"{}\"", BStr::new(s.as_ref())),
        }
    }
}

// Conversions for building value trees without ceremony.

impl From<bool> for PhpValue<'_> {
    fn from(b: bool) -> Self {
        PhpValue::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {$(
        impl From<$ty> for PhpValue<'_> {
            fn from(i: $ty) -> Self {
                PhpValue::Int(i64::from(i))
            }
        }

        impl From<$ty> for PhpKey<'_> {
            fn from(i: $ty) -> Self {
                PhpKey::Int(i64::from(i))
            }
        }
    )*};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for PhpValue<'_> {
    fn from(f: f64) -> Self {
        PhpValue::Float(f)
    }
}

impl From<f32> for PhpValue<'_> {
    fn from(f: f32) -> Self {
        // Widen through the shortest decimal form: 0.1f32 stays "0.1" rather
        // than becoming the binary expansion of the widened double.
        if f.is_finite() {
            PhpValue::Float(f.to_string().parse().unwrap_or_else(|_| f64::from(f)))
        } else {
            PhpValue::Float(f64::from(f))
        }
    }
}

impl<'a> From<&'a str> for PhpValue<'a> {
    fn from(s: &'a str) -> Self {
        PhpValue::String(Cow::Borrowed(s.as_bytes()))
    }
}

impl From<String> for PhpValue<'_> {
    fn from(s: String) -> Self {
        PhpValue::String(Cow::Owned(s.into_bytes()))
    }
}

impl<'a> From<&'a [u8]> for PhpValue<'a> {
    fn from(s: &'a [u8]) -> Self {
        PhpValue::String(Cow::Borrowed(s))
    }
}

impl From<Vec<u8>> for PhpValue<'_> {
    fn from(s: Vec<u8>) -> Self {
        PhpValue::String(Cow::Owned(s))
    }
}

impl<'a, T: Into<PhpValue<'a>>> From<Option<T>> for PhpValue<'a> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => PhpValue::Null,
        }
    }
}

impl<'a, V: Into<PhpValue<'a>>> From<BTreeMap<String, V>> for PhpValue<'a> {
    fn from(map: BTreeMap<String, V>) -> Self {
        PhpValue::Map(
            map.into_iter()
                .map(|(k, v)| (PhpKey::from(k), v.into()))
                .collect(),
        )
    }
}

impl<'a, V: Into<PhpValue<'a>>> From<HashMap<String, V>> for PhpValue<'a> {
    fn from(map: HashMap<String, V>) -> Self {
        PhpValue::Map(
            map.into_iter()
                .map(|(k, v)| (PhpKey::from(k), v.into()))
                .collect(),
        )
    }
}

impl<'a> FromIterator<PhpValue<'a>> for PhpValue<'a> {
    fn from_iter<I: IntoIterator<Item = PhpValue<'a>>>(iter: I) -> Self {
        PhpValue::List(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(PhpKey<'a>, PhpValue<'a>)> for PhpValue<'a> {
    fn from_iter<I: IntoIterator<Item = (PhpKey<'a>, PhpValue<'a>)>>(iter: I) -> Self {
        PhpValue::Map(iter.into_iter().collect())
    }
}

impl From<f64> for PhpKey<'_> {
    fn from(f: f64) -> Self {
        PhpKey::Float(f)
    }
}

impl<'a> From<&'a str> for PhpKey<'a> {
    fn from(s: &'a str) -> Self {
        PhpKey::String(Cow::Borrowed(s.as_bytes()))
    }
}

impl From<String> for PhpKey<'_> {
    fn from(s: String) -> Self {
        PhpKey::String(Cow::Owned(s.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option_none_is_null() {
        let v: PhpValue = Option::<i32>::None.into();
        assert!(v.is_null());
        let v: PhpValue = Some(7).into();
        assert_eq!(v, PhpValue::Int(7));
    }

    #[test]
    fn from_f32_keeps_shortest_form() {
        let v: PhpValue = 0.1f32.into();
        assert_eq!(v, PhpValue::Float(0.1));
    }

    #[test]
    fn map_get_matches_numeric_key_text() {
        let map = PhpValue::Map(vec![
            (PhpKey::Int(5), PhpValue::from("five")),
            (PhpKey::from("name"), PhpValue::from("Alice")),
        ]);
        assert_eq!(map.get("5").and_then(PhpValue::as_str), Some("five"));
        assert_eq!(map.get("name").and_then(PhpValue::as_str), Some("Alice"));
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn display_is_lossy_for_binary_strings() {
        let v = PhpValue::String(Cow::Borrowed(b"a\xffb".as_slice()));
        let rendered = format!("{}", v);
        assert!(rendered.starts_with('"') && rendered.ends_with('"'));
    }
}
