//! Query strings and `application/x-www-form-urlencoded` encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::error::ApiError;

/// Characters left unescaped by form encoding: alphanumerics and `*-._`.
/// Space is escaped here and rewritten to `+` afterwards.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// The query component of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Ordered key/value pairs, form-encoded when appended.
    Pairs(Vec<(String, String)>),
    /// Appended verbatim after `?`.
    Raw(String),
}

impl Query {
    /// Interpret a JSON value as a query: an object is flattened into pairs,
    /// an array must hold `[key, value]` pairs, a string is raw. Anything else
    /// is rejected.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Object(map) => {
                let mut pairs = Vec::with_capacity(map.len());
                for (key, value) in map {
                    flatten_into(key, value, &mut pairs);
                }
                Ok(Query::Pairs(pairs))
            }
            Value::Array(items) => items
                .into_iter()
                .map(pair_from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Query::Pairs),
            Value::String(raw) => Ok(Query::Raw(raw)),
            other => Err(ApiError::invalid(format!(
                "unexpected query type: {}",
                value_kind(&other)
            ))),
        }
    }

    /// The encoded query without the leading `?`; `None` when there is
    /// nothing to append.
    pub fn encode(&self) -> Option<String> {
        let encoded = match self {
            Query::Pairs(pairs) => encode_pairs(pairs),
            Query::Raw(raw) => raw.clone(),
        };
        (!encoded.is_empty()).then_some(encoded)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Query::Pairs(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Raw(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Raw(raw)
    }
}

/// Join pairs as `key=value&...`, form-encoding both sides.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", form_escape(k), form_escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_escape(raw: &str) -> String {
    utf8_percent_encode(raw, FORM).to_string().replace("%20", "+")
}

/// Flatten one entry of a structured value into form pairs. Arrays repeat
/// the key, nested objects use `outer[inner]` keys, `null` is an empty value.
pub(crate) fn flatten_into(key: String, value: Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(key.clone(), item, out);
            }
        }
        Value::Object(map) => {
            for (inner, value) in map {
                flatten_into(format!("{key}[{inner}]"), value, out);
            }
        }
        scalar => out.push((key, scalar_to_string(scalar))),
    }
}

fn pair_from_value(value: Value) -> Result<(String, String), ApiError> {
    match value {
        Value::Array(mut pair) if pair.len() == 2 => {
            let value = pair.pop().unwrap_or(Value::Null);
            let key = pair.pop().unwrap_or(Value::Null);
            if key.is_object() || key.is_array() || value.is_object() || value.is_array() {
                return Err(ApiError::invalid("query pairs must hold scalar values"));
            }
            Ok((scalar_to_string(key), scalar_to_string(value)))
        }
        other => Err(ApiError::invalid(format!(
            "expected a [key, value] query pair, got {}",
            value_kind(&other)
        ))),
    }
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
