//! Credential claims
//!
//! Typed attributes extracted from a verified credential. Claims are only
//! carried here; the rules that consume them live downstream.

use crate::error::ClaimsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Claims map, ordered by key so equality and serialization are deterministic
pub type Claims = BTreeMap<String, ClaimValue>;

/// A single claim value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Map(Claims),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Claims> {
        match self {
            ClaimValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

/// Convert an untyped JSON object into a claims map.
///
/// Nulls and arrays have no claim representation and are rejected with the
/// dotted path of the offending key.
pub fn claims_from_json(value: serde_json::Value) -> Result<Claims, ClaimsError> {
    match value {
        serde_json::Value::Object(map) => convert_object(map, ""),
        other => Err(ClaimsError::NotAnObject(json_kind(&other))),
    }
}

fn convert_object(
    map: serde_json::Map<String, serde_json::Value>,
    prefix: &str,
) -> Result<Claims, ClaimsError> {
    let mut claims = Claims::new();
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        let converted = convert_value(value, &path)?;
        claims.insert(key, converted);
    }
    Ok(claims)
}

fn convert_value(value: serde_json::Value, path: &str) -> Result<ClaimValue, ClaimsError> {
    use serde_json::Value;

    match value {
        Value::Bool(b) => Ok(ClaimValue::Bool(b)),
        Value::String(s) => Ok(ClaimValue::String(s)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ClaimValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(ClaimValue::Float(f))
            } else {
                Err(ClaimsError::Unsupported {
                    key: path.to_string(),
                    kind: "number",
                })
            }
        }
        Value::Object(map) => convert_object(map, path).map(ClaimValue::Map),
        other => Err(ClaimsError::Unsupported {
            key: path.to_string(),
            kind: json_kind(&other),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
