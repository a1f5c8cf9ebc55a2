//! Python bindings for php-serialize-core.

use std::borrow::Cow;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};

use php_serialize_core::{
    from_bytes_with_config, json::to_json_string, looks_serialized, to_bytes, ParserConfig,
    PhpKey, PhpValue,
};

pyo3::create_exception!(php_serialize, PhpCodecError, pyo3::exceptions::PyException);

/// Convert a PhpValue to a Python object.
fn php_value_to_python(py: Python<'_>, value: &PhpValue, errors: &str) -> PyResult<PyObject> {
    match value {
        PhpValue::Null => Ok(py.None()),
        PhpValue::Bool(b) => Ok(b.to_object(py)),
        PhpValue::Int(i) => Ok(i.to_object(py)),
        PhpValue::Float(f) => Ok(f.to_object(py)),
        PhpValue::String(s) => php_bytes_to_python(py, s, errors),
        PhpValue::List(items) => {
            let list = PyList::empty_bound(py);
            for v in items {
                list.append(php_value_to_python(py, v, errors)?)?;
            }
            Ok(list.to_object(py))
        }
        PhpValue::Map(pairs) => {
            let dict = PyDict::new_bound(py);
            for (k, v) in pairs {
                let key: PyObject = match k {
                    PhpKey::Int(i) => i.to_object(py),
                    PhpKey::Float(f) => f.to_object(py),
                    PhpKey::String(s) => php_bytes_to_python(py, s, errors)?,
                };
                dict.set_item(key, php_value_to_python(py, v, errors)?)?;
            }
            Ok(dict.to_object(py))
        }
    }
}

/// Convert a PHP byte string to a Python str (or bytes, per `errors` mode).
fn php_bytes_to_python(py: Python<'_>, bytes: &[u8], errors: &str) -> PyResult<PyObject> {
    match std::str::from_utf8(bytes) {
        Ok(string) => Ok(string.to_object(py)),
        Err(_) => match errors {
            "strict" => Err(PyValueError::new_err("Invalid UTF-8 in string")),
            "bytes" => Ok(PyBytes::new_bound(py, bytes).to_object(py)),
            // "replace" and any other value: substitute the replacement character
            _ => {
                let string = String::from_utf8_lossy(bytes);
                Ok(string.to_object(py))
            }
        },
    }
}

/// Convert a Python object into a PhpValue for encoding.
fn python_to_php(value: &Bound<'_, PyAny>) -> PyResult<PhpValue<'static>> {
    if value.is_none() {
        return Ok(PhpValue::Null);
    }
    // bool subclasses int in Python, so it has to be checked first
    if let Ok(b) = value.downcast::<PyBool>() {
        return Ok(PhpValue::Bool(b.is_true()));
    }
    if value.downcast::<PyInt>().is_ok() {
        let i: i64 = value.extract().map_err(|_| {
            PhpCodecError::new_err("integer does not fit in 64-bit signed range")
        })?;
        return Ok(PhpValue::Int(i));
    }
    if value.downcast::<PyFloat>().is_ok() {
        return Ok(PhpValue::Float(value.extract::<f64>()?));
    }
    if let Ok(s) = value.downcast::<PyString>() {
        return Ok(PhpValue::String(Cow::Owned(
            s.to_cow()?.into_owned().into_bytes(),
        )));
    }
    if let Ok(b) = value.downcast::<PyBytes>() {
        return Ok(PhpValue::String(Cow::Owned(b.as_bytes().to_vec())));
    }
    if let Ok(list) = value.downcast::<PyList>() {
        let mut items = Vec::with_capacity(list.len());
        for item in list.iter() {
            items.push(python_to_php(&item)?);
        }
        return Ok(PhpValue::List(items));
    }
    if let Ok(tuple) = value.downcast::<PyTuple>() {
        let mut items = Vec::with_capacity(tuple.len());
        for item in tuple.iter() {
            items.push(python_to_php(&item)?);
        }
        return Ok(PhpValue::List(items));
    }
    if let Ok(dict) = value.downcast::<PyDict>() {
        let mut pairs = Vec::with_capacity(dict.len());
        for (key, val) in dict.iter() {
            pairs.push((python_key_to_php(&key)?, python_to_php(&val)?));
        }
        return Ok(PhpValue::Map(pairs));
    }

    Err(PhpCodecError::new_err(format!(
        "cannot serialize object of type '{}'",
        value.get_type().name()?
    )))
}

/// Convert a Python dict key into a PhpKey.
fn python_key_to_php(key: &Bound<'_, PyAny>) -> PyResult<PhpKey<'static>> {
    if let Ok(b) = key.downcast::<PyBool>() {
        return Ok(PhpKey::Int(i64::from(b.is_true())));
    }
    if key.downcast::<PyInt>().is_ok() {
        let i: i64 = key.extract().map_err(|_| {
            PhpCodecError::new_err("integer key does not fit in 64-bit signed range")
        })?;
        return Ok(PhpKey::Int(i));
    }
    if key.downcast::<PyFloat>().is_ok() {
        return Ok(PhpKey::Float(key.extract::<f64>()?));
    }
    if let Ok(s) = key.downcast::<PyString>() {
        return Ok(PhpKey::String(Cow::Owned(
            s.to_cow()?.into_owned().into_bytes(),
        )));
    }
    if let Ok(b) = key.downcast::<PyBytes>() {
        return Ok(PhpKey::String(Cow::Owned(b.as_bytes().to_vec())));
    }

    Err(PhpCodecError::new_err(format!(
        "dict key of type '{}' is not a valid array key",
        key.get_type().name()?
    )))
}

/// Deserialize PHP serialized data to a Python object.
///
/// Args:
///     data: Bytes containing PHP serialized data
///     errors: Error handling mode for invalid UTF-8:
///         - "strict": Raise an exception
///         - "replace": Replace invalid bytes with replacement character (default)
///         - "bytes": Return bytes instead of string for binary data
///     max_depth: Maximum array/object nesting depth (default: 512)
///
/// Returns:
///     The deserialized Python object (dict, list, str, int, float, bool, or None)
///
/// Raises:
///     PhpCodecError: If the data cannot be parsed
///
/// Example:
///     >>> from php_serialize import loads
///     >>> loads(b'a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}')
///     {'name': 'Alice', 'age': 30}
#[pyfunction]
#[pyo3(signature = (data, *, errors="replace", max_depth=512))]
fn loads(py: Python<'_>, data: &[u8], errors: &str, max_depth: usize) -> PyResult<PyObject> {
    let config = ParserConfig { max_depth };

    let value = from_bytes_with_config(data, config)
        .map_err(|e| PhpCodecError::new_err(format!("{}", e)))?;

    php_value_to_python(py, &value, errors)
}

/// Serialize a Python object to PHP serialized bytes.
///
/// Lists and tuples become positionally-indexed arrays; dicts become
/// arrays with their pairs emitted in deterministic key order (numeric
/// keys first, then string keys in byte order).
///
/// Args:
///     obj: The object to serialize (dict, list, tuple, str, bytes, int,
///         float, bool, or None)
///
/// Returns:
///     Bytes in PHP serialize format
///
/// Raises:
///     PhpCodecError: If the object (or a nested item) is not serializable
///
/// Example:
///     >>> from php_serialize import dumps
///     >>> dumps({'name': 'Alice', 'age': 30})
///     b'a:2:{s:3:"age";i:30;s:4:"name";s:5:"Alice";}'
#[pyfunction]
fn dumps<'py>(py: Python<'py>, obj: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyBytes>> {
    let value = python_to_php(obj)?;
    let bytes = to_bytes(&value).map_err(|e| PhpCodecError::new_err(format!("{}", e)))?;
    Ok(PyBytes::new_bound(py, &bytes))
}

/// Deserialize PHP serialized data directly to a JSON string.
///
/// Avoids the overhead of intermediate Python objects when JSON output is
/// the goal.
///
/// Args:
///     data: Bytes containing PHP serialized data
///     max_depth: Maximum array/object nesting depth (default: 512)
///
/// Returns:
///     A JSON string representation of the deserialized data
///
/// Raises:
///     PhpCodecError: If the data cannot be parsed
///
/// Example:
///     >>> from php_serialize import loads_json
///     >>> loads_json(b'a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}')
///     '{"name":"Alice","age":30}'
#[pyfunction]
#[pyo3(signature = (data, *, max_depth=512))]
fn loads_json(data: &[u8], max_depth: usize) -> PyResult<String> {
    let config = ParserConfig { max_depth };

    let value = from_bytes_with_config(data, config)
        .map_err(|e| PhpCodecError::new_err(format!("{}", e)))?;

    to_json_string(&value).map_err(|e| PhpCodecError::new_err(format!("{}", e)))
}

/// Check if data looks like PHP serialized format.
///
/// This is a quick check that doesn't fully validate the data.
///
/// Args:
///     data: Bytes to check
///
/// Returns:
///     True if the data appears to be PHP serialized, False otherwise
///
/// Example:
///     >>> from php_serialize import is_serialized
///     >>> is_serialized(b'a:1:{i:0;s:3:"foo";}')
///     True
///     >>> is_serialized(b'not serialized')
///     False
#[pyfunction]
fn is_serialized(data: &[u8]) -> bool {
    looks_serialized(data)
}

/// Get the version of the library.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// PHP serialize codec module for Python.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("PhpCodecError", m.py().get_type_bound::<PhpCodecError>())?;
    m.add_function(wrap_pyfunction!(loads, m)?)?;
    m.add_function(wrap_pyfunction!(dumps, m)?)?;
    m.add_function(wrap_pyfunction!(loads_json, m)?)?;
    m.add_function(wrap_pyfunction!(is_serialized, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
