//! Decoder for PHP's serialize format.
//!
//! A zero-copy recursive-descent parser over a forward-only byte cursor: one
//! tag byte selects a production, each production consumes its body exactly
//! once, and container productions recurse. Decoded strings borrow from the
//! input where possible.
//!
//! Wire arrays and objects both land on [`PhpValue`]: an array whose keys are
//! exactly the positional indices `0..n-1` becomes a [`PhpValue::List`], any
//! other key shape becomes a [`PhpValue::Map`] with keys canonicalised to
//! their decimal text. An object's class name is parsed and discarded.
//!
//! Reference tokens (`r`/`R`) are consumed so the cursor stays aligned but
//! are *not* resolved; they decode to [`PhpValue::Null`]. Custom-serialized
//! objects (`C`) are rejected.
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature for parsing instrumentation:
//!
//! ```toml
//! php-serialize-core = { version = "0.2", features = ["tracing"] }
//! ```

use std::borrow::Cow;

use memchr::memchr;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::error::{ErrorKind, PhpCodecError, Result};
use crate::number::{canonical_float_text, canonical_int_text};
use crate::types::{PhpKey, PhpValue};

/// Maximum nesting depth to prevent stack overflow.
const MAX_DEPTH: usize = 512;

/// Parser configuration options.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum nesting depth for arrays and objects.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// A zero-copy parser for PHP serialized data.
pub struct Parser<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Parser configuration.
    config: ParserConfig,
    /// Current nesting depth.
    depth: usize,
    /// Number of value slots seen so far, used to range-check reference
    /// indices (PHP references are 1-indexed over decoded slots).
    slots: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, ParserConfig::default())
    }

    /// Create a new parser with custom configuration.
    pub fn with_config(data: &'a [u8], config: ParserConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            depth: 0,
            slots: 0,
        }
    }

    /// Parse one value from the start of the input.
    ///
    /// Empty input is an error, never a silent null. Bytes past the first
    /// complete value are ignored.
    #[cfg_attr(feature = "tracing", instrument(skip(self), fields(data_len = self.data.len())))]
    pub fn parse(&mut self) -> Result<PhpValue<'a>> {
        #[cfg(feature = "tracing")]
        debug!(data_len = self.data.len(), "Starting PHP decode");

        let result = self.parse_value();

        #[cfg(feature = "tracing")]
        match &result {
            Ok(value) => debug!(value_type = value.type_name(), "Decode completed"),
            Err(e) => warn!(error = %e, "Decode failed"),
        }

        result
    }

    /// Parse a single value at the current position.
    ///
    /// This is the core dispatch function that routes to type-specific
    /// productions based on the tag byte.
    fn parse_value(&mut self) -> Result<PhpValue<'a>> {
        if self.depth > self.config.max_depth {
            return Err(PhpCodecError::new(
                ErrorKind::MaxDepthExceeded(self.config.max_depth),
                self.pos,
            ));
        }

        let tag = self.peek_byte()?;

        #[cfg(feature = "tracing")]
        trace!(tag = %char::from(tag), pos = self.pos, "Parsing value");

        self.slots += 1;

        match tag {
            b'N' => self.parse_null(),
            b'b' => self.parse_bool(),
            b'i' => self.parse_int(),
            b'd' => self.parse_float(),
            b's' => self.parse_string(),
            b'a' => self.parse_array(),
            b'O' => self.parse_object(),
            b'R' | b'r' => self.parse_reference(),
            b'C' => Err(PhpCodecError::new(
                ErrorKind::UnsupportedTypeMarker('C'),
                self.pos,
            )
            .with_context("custom-serialized objects are not decoded")),
            _ => Err(PhpCodecError::new(
                ErrorKind::UnknownTypeMarker(tag as char),
                self.pos,
            )
            .with_input_preview(self.data, self.pos)),
        }
    }

    /// Parse a null value: `N;`
    fn parse_null(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'N')?;
        self.expect_byte(b';')?;
        Ok(PhpValue::Null)
    }

    /// Parse a boolean value: `b:0;` or `b:1;`
    fn parse_bool(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'b')?;
        self.expect_byte(b':')?;
        let value_byte = self.read_byte()?;
        self.expect_byte(b';')?;

        match value_byte {
            b'0' => Ok(PhpValue::Bool(false)),
            b'1' => Ok(PhpValue::Bool(true)),
            _ => Err(PhpCodecError::new(
                ErrorKind::InvalidBoolean((value_byte as char).to_string()),
                self.pos - 2,
            )),
        }
    }

    /// Parse an integer value: `i:<value>;`
    fn parse_int(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'i')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let value = self.read_until(b';')?;

        let int_str = std::str::from_utf8(value).map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidInteger("invalid UTF-8".into()), start)
        })?;

        let int_value: i64 = int_str.parse().map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidInteger(int_str.to_string()), start)
        })?;

        self.expect_byte(b';')?;
        Ok(PhpValue::Int(int_value))
    }

    /// Parse a float/double value: `d:<value>;`
    fn parse_float(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'd')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let value = self.read_until(b';')?;

        let float_str = std::str::from_utf8(value).map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidFloat("invalid UTF-8".into()), start)
        })?;

        // PHP spells out non-finite floats
        let float_value: f64 = match float_str {
            "INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            "NAN" => f64::NAN,
            _ => float_str.parse().map_err(|_| {
                PhpCodecError::new(ErrorKind::InvalidFloat(float_str.to_string()), start)
            })?,
        };

        self.expect_byte(b';')?;
        Ok(PhpValue::Float(float_value))
    }

    /// Parse a string value: `s:<len>:"<bytes>";`
    fn parse_string(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b's')?;
        let bytes = self.parse_string_body(true)?;
        Ok(PhpValue::String(Cow::Borrowed(bytes)))
    }

    /// Parse a string body: `:<len>:"<bytes>"` plus the trailing `;` when
    /// `terminated`. The length field counts raw bytes, not characters.
    ///
    /// Also used for an object's class-name field, which omits the `;`.
    fn parse_string_body(&mut self, terminated: bool) -> Result<&'a [u8]> {
        let len = self.read_length()?;
        self.expect_byte(b'"')?;

        let start = self.pos;
        if len > self.data.len() - self.pos {
            return Err(PhpCodecError::new(
                ErrorKind::StringLengthMismatch {
                    expected: len,
                    found: self.data.len() - self.pos,
                },
                start,
            ));
        }

        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;

        self.expect_byte(b'"')?;
        if terminated {
            self.expect_byte(b';')?;
        }
        Ok(bytes)
    }

    /// Parse an array value: `a:<count>:{<key><value>...}`
    fn parse_array(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'a')?;
        self.parse_array_body()
    }

    /// Parse an object value: `O:<namelen>:"<name>":<count>:{<key><value>...}`
    ///
    /// The class name is read and discarded; the remainder is decoded exactly
    /// like an array, so objects and arrays with the same pairs are
    /// indistinguishable after decoding.
    fn parse_object(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'O')?;
        let _class_name = self.parse_string_body(false)?;
        self.parse_array_body()
    }

    /// Parse an array/object body: `:<count>:{<key><value>...}`, then decide
    /// between the list and map representations.
    fn parse_array_body(&mut self) -> Result<PhpValue<'a>> {
        let count = self.read_length()?;
        self.expect_byte(b'{')?;

        self.depth += 1;
        let mut pairs = Vec::with_capacity(count.min(1024)); // Cap initial allocation

        for _ in 0..count {
            let key = self.parse_value()?;

            match &key {
                PhpValue::String(_) | PhpValue::Int(_) | PhpValue::Float(_) => {}
                _ => {
                    return Err(PhpCodecError::new(ErrorKind::InvalidArrayKey, self.pos)
                        .with_context(format!("key decoded to {}", key.type_name())));
                }
            }

            let value = self.parse_value()?;
            pairs.push((key, value));
        }

        self.depth -= 1;
        self.expect_byte(b'}')?;

        Ok(reclassify_pairs(pairs))
    }

    /// Parse a reference token: `R:<index>;` or `r:<index>;`
    ///
    /// The body is consumed so the cursor stays aligned and the index is
    /// range-checked, but aliasing is not resolved: the token decodes to
    /// null. Resolving would require value identities across the whole
    /// decode, which this codec does not track.
    fn parse_reference(&mut self) -> Result<PhpValue<'a>> {
        let _ref_type = self.read_byte()?; // R = object reference, r = value reference
        self.expect_byte(b':')?;

        let idx_start = self.pos;
        let idx_bytes = self.read_until(b';')?;
        let idx_str = std::str::from_utf8(idx_bytes).map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidInteger("invalid UTF-8".into()), idx_start)
        })?;
        let idx: usize = idx_str.parse().map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidInteger(idx_str.to_string()), idx_start)
        })?;

        self.expect_byte(b';')?;

        // PHP references are 1-indexed
        if idx == 0 || idx > self.slots {
            return Err(PhpCodecError::new(
                ErrorKind::InvalidReference(idx),
                idx_start,
            ));
        }

        Ok(PhpValue::Null)
    }

    // Helper methods - marked #[inline] for performance on hot paths

    /// Peek at the current byte without consuming it.
    #[inline(always)]
    fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| PhpCodecError::new(ErrorKind::UnexpectedEof, self.pos))
    }

    /// Read and consume the current byte.
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Expect a specific byte, returning an error if it doesn't match.
    #[inline]
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let byte = self.read_byte()?;
        if byte != expected {
            return Err(self.make_unexpected_char_error(expected, byte));
        }
        Ok(())
    }

    /// Create an unexpected character error with proper context.
    #[cold]
    #[inline(never)]
    fn make_unexpected_char_error(&self, expected: u8, found: u8) -> PhpCodecError {
        PhpCodecError::new(
            ErrorKind::UnexpectedChar {
                expected: expected as char,
                found: found as char,
            },
            self.pos - 1,
        )
        .with_input_preview(self.data, self.pos.saturating_sub(1))
    }

    /// Read a length or count field: `:<digits>:`. Always non-negative.
    #[inline]
    fn read_length(&mut self) -> Result<usize> {
        self.expect_byte(b':')?;

        let start = self.pos;
        let digits = self.read_until(b':')?;
        let text = std::str::from_utf8(digits).map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidLength("invalid UTF-8".into()), start)
        })?;
        let len: usize = text.parse().map_err(|_| {
            PhpCodecError::new(ErrorKind::InvalidLength(text.to_string()), start)
                .with_input_preview(self.data, start)
        })?;

        self.expect_byte(b':')?;
        Ok(len)
    }

    /// Read bytes until the delimiter, using SIMD-accelerated search.
    #[inline]
    fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        match memchr(delimiter, &self.data[start..]) {
            Some(offset) => {
                let result = &self.data[start..start + offset];
                self.pos = start + offset;
                Ok(result)
            }
            None => Err(self.make_delimiter_not_found_error(delimiter)),
        }
    }

    /// Create a delimiter not found error with proper context.
    #[cold]
    #[inline(never)]
    fn make_delimiter_not_found_error(&self, delimiter: u8) -> PhpCodecError {
        PhpCodecError::new(
            ErrorKind::UnexpectedChar {
                expected: delimiter as char,
                found: if self.pos < self.data.len() {
                    self.data[self.pos] as char
                } else {
                    '\0'
                },
            },
            self.pos,
        )
        .with_input_preview(self.data, self.pos)
    }
}

/// Decide between the list and map representations for decoded pairs.
///
/// When every key is the integer matching its position, the keys are
/// implicit and the pairs collapse to a list. Otherwise the keys are kept,
/// with numeric keys rendered to their decimal text.
fn reclassify_pairs<'a>(pairs: Vec<(PhpValue<'a>, PhpValue<'a>)>) -> PhpValue<'a> {
    let positional = pairs
        .iter()
        .enumerate()
        .all(|(i, (k, _))| matches!(k, PhpValue::Int(idx) if *idx >= 0 && *idx as usize == i));

    if positional {
        return PhpValue::List(pairs.into_iter().map(|(_, v)| v).collect());
    }

    PhpValue::Map(
        pairs
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    PhpValue::Int(i) => {
                        PhpKey::String(Cow::Owned(canonical_int_text(i).into_bytes()))
                    }
                    PhpValue::Float(f) => {
                        PhpKey::String(Cow::Owned(canonical_float_text(f).into_bytes()))
                    }
                    PhpValue::String(s) => PhpKey::String(s),
                    // parse_array_body already rejected every other kind
                    _ => unreachable!("non-key value survived key validation"),
                };
                (key, v)
            })
            .collect(),
    )
}

/// Decode PHP serialized data from bytes.
///
/// This is the primary API for the decode direction. One value is decoded
/// per call; trailing bytes after it are ignored.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::from_bytes;
///
/// let value = from_bytes(b"i:42;").unwrap();
/// assert_eq!(value.as_int(), Some(42));
/// ```
#[inline]
pub fn from_bytes(data: &[u8]) -> Result<PhpValue<'_>> {
    let mut parser = Parser::new(data);
    parser.parse()
}

/// Decode PHP serialized data from bytes with custom configuration.
///
/// # Example
///
/// ```rust
/// use php_serialize_core::{from_bytes_with_config, ParserConfig};
///
/// let config = ParserConfig { max_depth: 64 };
/// let value = from_bytes_with_config(b"i:42;", config).unwrap();
/// assert_eq!(value.as_int(), Some(42));
/// ```
#[inline]
pub fn from_bytes_with_config(data: &[u8], config: ParserConfig) -> Result<PhpValue<'_>> {
    let mut parser = Parser::with_config(data, config);
    parser.parse()
}

/// Quick check whether data could be PHP serialized.
///
/// Only sniffs the first byte; it does not validate the input.
pub fn looks_serialized(data: &[u8]) -> bool {
    match data.first() {
        Some(&first) => matches!(
            first,
            b'N' | b'b' | b'i' | b'd' | b's' | b'a' | b'O' | b'C' | b'R' | b'r'
        ),
        None => false,
    }
}
