//! The connection an `Endpoint` performs its round trips through.
//!
//! # Design
//! `Transport` is the only seam that touches the network. `UreqTransport` is
//! the default: a blocking `ureq` agent bound to one origin. Its agent is
//! `Send + Sync` and pools connections internally, so a single `Endpoint`
//! may be shared across threads without extra locking. Tests and callers
//! with other needs inject their own `Transport`.

use std::io::Read as _;

use bytes::Bytes;
use ureq::http;

use crate::config::TransportConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::uri::BaseUri;

/// Performs one HTTP round trip. Implementations must be safe to call from
/// several threads at once.
pub trait Transport: Send + Sync {
    fn perform(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// A [`Transport`] backed by [`ureq`] (blocking).
#[derive(Debug)]
pub struct UreqTransport {
    agent: ureq::Agent,
    origin: String,
    tls: bool,
    verify_certificates: bool,
}

impl UreqTransport {
    /// Bind a transport to the origin of `base`. TLS is used iff the scheme
    /// is `https`; certificate checks are skipped only when `insecure`.
    pub fn connect(base: &BaseUri, config: &TransportConfig) -> Result<Self, ApiError> {
        let mut builder = ureq::Agent::config_builder()
            // Status codes are validated by the endpoint.
            .http_status_as_error(false)
            .timeout_global(config.timeout());

        if config.insecure {
            builder = builder.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }
        // Only the configured proxy is used; environment proxies are ignored.
        let proxy = match config.proxy_uri()? {
            Some(uri) => Some(
                ureq::Proxy::new(&uri)
                    .map_err(|e| ApiError::invalid(format!("invalid proxy settings: {e}")))?,
            ),
            None => None,
        };
        builder = builder.proxy(proxy);

        tracing::debug!(origin = %base.origin(), insecure = config.insecure, "transport configured");
        Ok(Self {
            agent: builder.build().new_agent(),
            origin: base.origin(),
            tls: base.is_tls(),
            verify_certificates: !config.insecure,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// `false` only when built with `insecure`; meaningless without TLS.
    pub fn verifies_certificates(&self) -> bool {
        self.verify_certificates
    }
}

impl Transport for UreqTransport {
    fn perform(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = http::Request::builder()
            .method(to_method(request.method))
            .uri(format!("{}{}", self.origin, request.path));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match request.body {
            Some(body) => {
                let req = builder
                    .body(body.to_vec())
                    .map_err(|e| TransportError::Other(e.to_string()))?;
                self.agent.run(req)
            }
            None => {
                let req = builder
                    .body(())
                    .map_err(|e| TransportError::Other(e.to_string()))?;
                self.agent.run(req)
            }
        };

        match result {
            Ok(response) => convert_response(response),
            Err(ureq::Error::Timeout(_)) => Err(TransportError::Timeout),
            Err(ureq::Error::HostNotFound) => {
                Err(TransportError::Connection("host not found".to_owned()))
            }
            Err(ureq::Error::ConnectionFailed) => {
                Err(TransportError::Connection("connection failed".to_owned()))
            }
            Err(ureq::Error::Io(e)) => Err(TransportError::Connection(e.to_string())),
            Err(e) => Err(TransportError::Other(e.to_string())),
        }
    }
}

fn to_method(method: HttpMethod) -> http::Method {
    match method {
        HttpMethod::Get => http::Method::GET,
        HttpMethod::Post => http::Method::POST,
        HttpMethod::Put => http::Method::PUT,
        HttpMethod::Patch => http::Method::PATCH,
        HttpMethod::Delete => http::Method::DELETE,
    }
}

fn convert_response(response: http::Response<ureq::Body>) -> Result<HttpResponse, TransportError> {
    let (parts, body) = response.into_parts();

    let mut body_bytes = Vec::new();
    body.into_reader()
        .read_to_end(&mut body_bytes)
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        status_message: reason_phrase(parts.status),
        headers,
        body: Bytes::from(body_bytes),
    })
}

/// ureq does not expose the reason phrase the server sent, so the
/// canonical one stands in; unregistered codes get `HTTP <code>`.
fn reason_phrase(status: http::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
