//! Minimal REST client with composable path/header scopes.
//!
//! # Overview
//! An `Endpoint` owns a transport bound to a base URI and issues CRUD calls
//! (GET/POST/PUT/PATCH/DELETE). `Scope`s borrow a parent (an `Endpoint` or
//! another `Scope`), prefix a path segment, and add default headers, all
//! without opening new connections.
//!
//! # Design
//! - Both implement `Requester`; a `Scope` rewrites the call and forwards it
//!   to its parent until it reaches the `Endpoint`.
//! - Headers merge right-biased and case-insensitively: call site over scope
//!   over ancestor scopes over endpoint defaults.
//! - Request payloads are serialized and response bodies parsed by content
//!   type (`application/json`, form encoding, or raw passthrough).
//! - The network sits behind the `Transport` trait; `UreqTransport` is the
//!   default.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod http;
pub mod payload;
pub mod query;
pub mod requester;
pub mod response;
pub mod scope;
pub mod transport;
pub mod uri;

pub use config::TransportConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, TransportError};
pub use headers::Headers;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::Payload;
pub use query::Query;
pub use requester::{RequestOptions, Requester};
pub use response::ResponseBody;
pub use scope::Scope;
pub use transport::{Transport, UreqTransport};
pub use uri::BaseUri;
