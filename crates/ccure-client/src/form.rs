//! Form encoding for write operations.
//!
//! The victorwebservice write endpoints take `application/x-www-form-urlencoded`
//! bodies whose keys describe nested structure with brackets:
//!
//! ```text
//! {"type": "Personnel", "ID": 5001,
//!  "Children": [{"Type": "Credential", "PropertyNames": ["CHUID"]}]}
//!
//! type=Personnel
//! ID=5001
//! Children[0][Type]=Credential
//! Children[0][PropertyNames][0]=CHUID
//! ```
//!
//! Lists produce indexed keys (`key[i]`), objects produce named keys
//! (`key[sub]`), and the two compose to any depth.

use serde_json::Value;

use crate::error::{Error, Result};

/// Flatten a JSON object into ordered `(key, value)` pairs.
///
/// Strings are used verbatim, numbers in decimal, booleans as `true`/`false`
/// and null as an empty value. Empty lists and objects contribute nothing.
pub fn flatten_form(value: &Value) -> Result<Vec<(String, String)>> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::usage("form body must be a JSON object"))?;

    let mut pairs = Vec::new();
    for (key, item) in map {
        flatten_into(key.clone(), item, &mut pairs);
    }
    Ok(pairs)
}

/// Flatten and URL-encode a JSON object, joining pairs with `&`.
pub fn encode_form(value: &Value) -> Result<String> {
    let pairs = flatten_form(value)?;
    Ok(serde_urlencoded::to_string(&pairs)?)
}

fn flatten_into(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (sub, item) in map {
                flatten_into(format!("{key}[{sub}]"), item, pairs);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_into(format!("{key}[{i}]"), item, pairs);
            }
        }
        scalar => pairs.push((key, scalar_text(scalar))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // containers are expanded by flatten_into
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}
