//! Response validation and content-type driven parsing.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpResponse, JSON_CONTENT_TYPE};

/// The parsed result of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body (e.g. `204 No Content`).
    Empty,
    /// A body declared as `application/json`.
    Json(Value),
    /// Any other content type, unparsed.
    Raw(Bytes),
}

impl ResponseBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The body as text: raw bodies lossily decoded, JSON re-serialized.
    pub fn text(&self) -> String {
        match self {
            ResponseBody::Empty => String::new(),
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Raw(raw) => String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Deserialize a JSON body into `T`. Empty bodies deserialize from `null`,
    /// so `Option<T>` targets accept them.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            ResponseBody::Empty => Value::Null,
            ResponseBody::Json(value) => value,
            ResponseBody::Raw(raw) => serde_json::from_slice(&raw)
                .map_err(|e| ApiError::Parse(e.to_string()))?,
        };
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Reject any status outside 2xx. The body is carried into the error as text
/// and never handed to the JSON parser.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::warn!(
        status = response.status,
        message = %response.status_message,
        "request failed"
    );
    Err(ApiError::BadResponse {
        status: response.status,
        message: response.status_message.clone(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}

/// Parse a validated response by its declared content type.
pub fn parse_body(response: HttpResponse) -> Result<ResponseBody, ApiError> {
    if response.body.is_empty() {
        return Ok(ResponseBody::Empty);
    }
    match response.content_type().as_deref() {
        Some(JSON_CONTENT_TYPE) => {
            if response.body.iter().all(u8::is_ascii_whitespace) {
                return Ok(ResponseBody::Empty);
            }
            serde_json::from_slice(&response.body)
                .map(ResponseBody::Json)
                .map_err(|e| ApiError::Parse(e.to_string()))
        }
        _ => Ok(ResponseBody::Raw(response.body)),
    }
}

/// Validate, then parse.
pub fn parse_response(response: HttpResponse) -> Result<ResponseBody, ApiError> {
    check_status(&response)?;
    parse_body(response)
}
