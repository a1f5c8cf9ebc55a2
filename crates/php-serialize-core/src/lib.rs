//! Encoder and decoder for PHP's `serialize()` text format.
//!
//! This crate converts between a dynamically-typed value tree ([`PhpValue`])
//! and the byte representation produced by PHP's `serialize()` /
//! `unserialize()` pair. Both directions are pure, single-pass transforms
//! with no shared state.
//!
//! # Features
//!
//! - **Zero-copy decoding** - Decoded strings borrow from the input buffer
//! - **Byte-exact encoding** - Length-prefixed output matching PHP's own
//! - **Deterministic maps** - Map pairs emit sorted, numeric keys first
//! - **UTF-8 aware** - String length fields count bytes, never characters
//! - **Detailed errors** - Error kind, byte position, and input preview
//!
//! # Quick Start
//!
//! ```rust
//! use php_serialize_core::{from_bytes, to_bytes, PhpValue};
//!
//! let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
//! let value = from_bytes(data).unwrap();
//! assert_eq!(value.get("age").and_then(PhpValue::as_int), Some(30));
//!
//! // Re-encoding emits the pairs sorted by key
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(&bytes[..], br#"a:2:{s:3:"age";i:30;s:4:"name";s:5:"Alice";}"#.as_slice());
//! ```
//!
//! # Supported Types
//!
//! | PHP wire form | Rust Type |
//! |---------------|-----------|
//! | `N;` | `PhpValue::Null` |
//! | `b:0;` / `b:1;` | `PhpValue::Bool(bool)` |
//! | `i:<n>;` | `PhpValue::Int(i64)` |
//! | `d:<x>;` | `PhpValue::Float(f64)` |
//! | `s:<len>:"...";` | `PhpValue::String(Cow<[u8]>)` |
//! | `a:<n>:{...}` keyed `0..n-1` | `PhpValue::List(Vec<PhpValue>)` |
//! | `a:<n>:{...}` otherwise | `PhpValue::Map(Vec<(PhpKey, PhpValue)>)` |
//! | `O:<len>:"<class>":<n>:{...}` | decoded like `a`; class name discarded |
//! | `r:<i>;` / `R:<i>;` | `PhpValue::Null` (aliasing not resolved) |
//! | `C:...` | rejected (custom serialization not supported) |
//!
//! # Out of scope
//!
//! Reference tokens are consumed but never resolved, object class names are
//! discarded, `C` payloads are rejected, and integers are confined to the
//! 64-bit signed range. Decoded objects are indistinguishable from arrays.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::inline_always)]
#![allow(clippy::unnecessary_wraps)]

pub mod error;
pub mod number;
pub mod parser;
pub mod types;
pub mod writer;

#[cfg(feature = "serde")]
pub mod json;

pub use error::{ErrorKind, PhpCodecError, Result};
pub use parser::{from_bytes, from_bytes_with_config, looks_serialized, Parser, ParserConfig};
pub use types::{PhpKey, PhpValue};
pub use writer::to_bytes;

#[cfg(feature = "serde")]
pub use json::{from_json, from_serialize, to_json};
