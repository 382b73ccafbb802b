//! The root requester: owns the transport and the base URI.
//!
//! # Design
//! Each CRUD call is split into `build_request` (merge headers, compose the
//! path, serialize the payload) and `parse_response` (validate the status,
//! parse the body), with the transport round trip in between. Both halves
//! are pure and usable on their own; only `send` does I/O.

use crate::config::TransportConfig;
use crate::error::ApiError;
use crate::headers::Headers;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};
use crate::query::Query;
use crate::requester::{RequestOptions, Requester};
use crate::response::{self, ResponseBody};
use crate::transport::{Transport, UreqTransport};
use crate::uri::BaseUri;

/// A client bound to one base URI.
///
/// Safe to share between threads when its transport is (the `Transport`
/// trait requires it); no locking is added here.
#[derive(Debug)]
pub struct Endpoint<T = UreqTransport> {
    base: BaseUri,
    transport: T,
    default_headers: Headers,
}

impl Endpoint<UreqTransport> {
    /// Parse `base_uri` and open a `ureq` transport to its origin.
    pub fn new<U>(base_uri: U, config: &TransportConfig) -> Result<Self, ApiError>
    where
        U: TryInto<BaseUri, Error = ApiError>,
    {
        let base = base_uri.try_into()?;
        let transport = UreqTransport::connect(&base, config)?;
        Ok(Self::from_parts(base, transport))
    }
}

impl<T: Transport> Endpoint<T> {
    /// Use a caller-supplied transport, already bound to `base_uri`'s origin.
    pub fn with_transport<U>(base_uri: U, transport: T) -> Result<Self, ApiError>
    where
        U: TryInto<BaseUri, Error = ApiError>,
    {
        Ok(Self::from_parts(base_uri.try_into()?, transport))
    }

    fn from_parts(base: BaseUri, transport: T) -> Self {
        Self {
            base,
            transport,
            default_headers: Headers::from([("Content-Type", JSON_CONTENT_TYPE)]),
        }
    }

    pub fn base_uri(&self) -> &BaseUri {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    pub fn default_headers_mut(&mut self) -> &mut Headers {
        &mut self.default_headers
    }

    /// The origin-relative path for `path` under the base path, plus query.
    pub fn full_path(&self, path: &str, query: Option<&Query>) -> String {
        let mut full = join_path(self.base.path(), path);
        if let Some(encoded) = query.and_then(|q| q.encode()) {
            full.push('?');
            full.push_str(&encoded);
        }
        full
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let headers = self.default_headers.merged(&options.headers);
        validate_headers(&headers)?;

        let body = if method.has_body() {
            let body = match &options.payload {
                Some(payload) => payload.serialize(headers.get("content-type"))?,
                None => bytes::Bytes::new(),
            };
            Some(body)
        } else {
            None
        };

        let path = self.full_path(path, options.query.as_ref());
        validate_path(&path)?;

        Ok(HttpRequest {
            method,
            path,
            headers: headers.to_pairs(),
            body,
        })
    }

    pub fn parse_response(&self, response: HttpResponse) -> Result<ResponseBody, ApiError> {
        response::parse_response(response)
    }
}

impl<T: Transport> Requester for Endpoint<T> {
    fn send(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let request = self.build_request(method, path, options)?;
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let response = self.transport.perform(request)?;
        tracing::debug!(status = response.status, bytes = response.body.len(), "received response");

        self.parse_response(response)
    }
}

/// Join the base path and a relative path: each part is stripped of
/// surrounding `/`, empty parts dropped, the result prefixed with one `/`.
pub fn join_path(base: &str, path: &str) -> String {
    let parts: Vec<&str> = [base, path]
        .into_iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect();
    format!("/{}", parts.join("/"))
}

/// The composed path and query must form a valid request target. A `#`
/// would start a fragment and truncate what is sent, so it is rejected too.
fn validate_path(path: &str) -> Result<(), ApiError> {
    use ureq::http::uri::PathAndQuery;

    if path.contains('#') {
        return Err(ApiError::invalid(format!(
            "path or query contains '#': {path:?}"
        )));
    }
    path.parse::<PathAndQuery>()
        .map_err(|e| ApiError::invalid(format!("invalid path or query {path:?}: {e}")))?;
    Ok(())
}

fn validate_headers(headers: &Headers) -> Result<(), ApiError> {
    use ureq::http::header::{HeaderName, HeaderValue};

    for (name, value) in headers.iter() {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::invalid(format!("invalid header name: {name:?}")))?;
        HeaderValue::from_str(value)
            .map_err(|_| ApiError::invalid(format!("invalid value for header {name}")))?;
    }
    Ok(())
}
