//! Pre-decode screening of provider response bodies.

use serde_json::Value;

use crate::{Result, SerperError};

/// Object keys that indicate a prototype-pollution payload.
const FORBIDDEN_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Maximum object/array nesting accepted before a body is rejected.
const MAX_DEPTH: usize = 64;

/// Screens a raw response body before typed decoding.
///
/// Rejects bodies carrying prototype-pollution key names at any nesting
/// depth, and bodies nested deeper than [`MAX_DEPTH`] levels. Malformed
/// JSON surfaces as a decode failure.
pub(crate) fn validate_json(body: &[u8]) -> Result<()> {
    let value: Value = serde_json::from_slice(body).map_err(SerperError::Decode)?;
    check_value(&value, 0)
}

fn check_value(value: &Value, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(SerperError::UnsafeBody(format!(
            "nesting exceeds {} levels",
            MAX_DEPTH
        )));
    }
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                if FORBIDDEN_KEYS.contains(&key.as_str()) {
                    return Err(SerperError::UnsafeBody(format!(
                        "forbidden key {:?}",
                        key
                    )));
                }
                check_value(nested, depth + 1)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                check_value(item, depth + 1)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
