//! Request payloads and their serialization per content type.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{media_type, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::query::{encode_pairs, flatten_into, value_kind};

/// The body of a write call, decided at the call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Sent unchanged regardless of content type.
    Raw(Bytes),
    /// Serialized according to the effective `Content-Type`.
    Structured(Value),
}

impl Payload {
    /// Wrap any serializable value as a structured payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Payload::from_value)
            .map_err(|e| ApiError::invalid(format!("payload is not serializable: {e}")))
    }

    /// A JSON string becomes a raw payload; every other value is structured.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(raw) => Payload::Raw(Bytes::from(raw)),
            other => Payload::Structured(other),
        }
    }

    /// Serialize for transmission under `content_type`.
    ///
    /// JSON keeps object keys in the order given. Form encoding flattens an
    /// object into `key=value` pairs. Other content types get the value's
    /// plain textual form.
    pub fn serialize(&self, content_type: Option<&str>) -> Result<Bytes, ApiError> {
        let value = match self {
            Payload::Raw(raw) => return Ok(raw.clone()),
            Payload::Structured(value) => value,
        };

        match content_type.map(media_type).as_deref() {
            Some(JSON_CONTENT_TYPE) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| ApiError::invalid(format!("payload is not serializable: {e}"))),
            Some(FORM_CONTENT_TYPE) => match value {
                Value::Object(map) => {
                    let mut pairs = Vec::with_capacity(map.len());
                    for (key, value) in map.clone() {
                        flatten_into(key, value, &mut pairs);
                    }
                    Ok(Bytes::from(encode_pairs(&pairs)))
                }
                other => Err(ApiError::invalid(format!(
                    "form payloads must be objects, got {}",
                    value_kind(other)
                ))),
            },
            _ => Ok(Bytes::from(value.to_string())),
        }
    }
}

impl From<&str> for Payload {
    fn from(raw: &str) -> Self {
        Payload::Raw(Bytes::copy_from_slice(raw.as_bytes()))
    }
}

impl From<String> for Payload {
    fn from(raw: String) -> Self {
        Payload::Raw(Bytes::from(raw))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(raw: Vec<u8>) -> Self {
        Payload::Raw(Bytes::from(raw))
    }
}

impl From<Bytes> for Payload {
    fn from(raw: Bytes) -> Self {
        Payload::Raw(raw)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_keeps_key_order() {
        let payload = Payload::from(json!({"name": "a", "count": 2, "active": true}));
        let body = payload.serialize(Some(JSON_CONTENT_TYPE)).unwrap();
        assert_eq!(&body[..], br#"{"name":"a","count":2,"active":true}"#);
    }

    #[test]
    fn json_match_ignores_parameters() {
        let payload = Payload::from(json!({"a": [1, 2]}));
        let body = payload
            .serialize(Some("application/json; charset=utf-8"))
            .unwrap();
        assert_eq!(&body[..], br#"{"a":[1,2]}"#);
    }

    #[test]
    fn raw_passes_through_any_content_type() {
        let payload = Payload::from("<xml/>");
        for ct in [Some(JSON_CONTENT_TYPE), Some(FORM_CONTENT_TYPE), Some("text/xml"), None] {
            assert_eq!(&payload.serialize(ct).unwrap()[..], b"<xml/>");
        }
    }

    #[test]
    fn json_string_value_is_raw() {
        assert_eq!(Payload::from(json!("as-is")), Payload::from("as-is"));
    }

    #[test]
    fn form_flattens_and_escapes() {
        let payload = Payload::from(json!({"name": "a b", "tags": ["x", "y&z"]}));
        let body = payload.serialize(Some(FORM_CONTENT_TYPE)).unwrap();
        assert_eq!(&body[..], b"name=a+b&tags=x&tags=y%26z");
    }

    #[test]
    fn form_rejects_non_objects() {
        let payload = Payload::from(json!([1, 2]));
        let err = payload.serialize(Some(FORM_CONTENT_TYPE)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn other_content_types_get_plain_text() {
        let payload = Payload::from(json!({"k": 1}));
        let body = payload.serialize(Some("text/plain")).unwrap();
        assert_eq!(&body[..], br#"{"k":1}"#);
        let body = Payload::from(json!(12)).serialize(None).unwrap();
        assert_eq!(&body[..], b"12");
    }

    #[test]
    fn serializable_structs_become_structured() {
        #[derive(Serialize)]
        struct Item {
            name: &'static str,
        }
        let payload = Payload::json(&Item { name: "a" }).unwrap();
        assert_eq!(payload, Payload::Structured(json!({"name": "a"})));
    }
}
