//! The CRUD surface shared by `Endpoint` and `Scope`.

use crate::error::ApiError;
use crate::headers::Headers;
use crate::http::HttpMethod;
use crate::payload::Payload;
use crate::query::Query;
use crate::response::ResponseBody;
use crate::scope::Scope;

/// Optional parts of a call: extra headers, a query, and (for writes) a
/// payload. A payload given to GET or DELETE is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Headers,
    pub query: Option<Query>,
    pub payload: Option<Payload>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Something CRUD calls can be issued against.
///
/// `Endpoint` performs the round trip; `Scope` rewrites path and headers and
/// forwards to its parent. Only `send` is required.
pub trait Requester {
    fn send(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ResponseBody, ApiError>;

    fn get(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        self.send(HttpMethod::Get, path, options)
    }

    fn delete(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        self.send(HttpMethod::Delete, path, options)
    }

    fn post(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        self.send(HttpMethod::Post, path, options)
    }

    fn put(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        self.send(HttpMethod::Put, path, options)
    }

    fn patch(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ApiError> {
        self.send(HttpMethod::Patch, path, options)
    }

    /// A child scope that prefixes `segment` and adds `headers` as defaults.
    /// `"/"` adds no segment.
    fn new_scope(&self, segment: &str, headers: Headers) -> Scope<'_, Self> {
        Scope::new(self, segment, headers)
    }
}
