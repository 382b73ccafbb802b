//! Validated base URI of an `Endpoint`.

use std::fmt;
use std::str::FromStr;

use ureq::http::Uri;

use crate::error::ApiError;

/// Whether the endpoint is reached over TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// An absolute `http`/`https` URI split into the parts the client needs.
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUri {
    scheme: Scheme,
    host: String,
    port: u16,
    path: String,
}

impl BaseUri {
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let uri: Uri = input
            .trim()
            .parse()
            .map_err(|e| ApiError::invalid(format!("malformed base URI {input:?}: {e}")))?;
        Self::from_uri(&uri)
    }

    pub fn from_uri(uri: &Uri) -> Result<Self, ApiError> {
        let scheme = match uri.scheme_str() {
            Some(s) if s.eq_ignore_ascii_case("http") => Scheme::Http,
            Some(s) if s.eq_ignore_ascii_case("https") => Scheme::Https,
            Some(other) => {
                return Err(ApiError::invalid(format!("unsupported URI scheme: {other}")))
            }
            None => return Err(ApiError::invalid(format!("base URI is not absolute: {uri}"))),
        };
        let host = match uri.host() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(ApiError::invalid(format!("base URI has no host: {uri}"))),
        };
        Ok(Self {
            scheme,
            port: uri.port_u16().unwrap_or_else(|| scheme.default_port()),
            host,
            path: uri.path().to_string(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The base path; `/` when the URI had none.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_tls(&self) -> bool {
        self.scheme == Scheme::Https
    }

    /// `scheme://host:port`, the part a transport connects to.
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.path)
    }
}

impl FromStr for BaseUri {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for BaseUri {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for BaseUri {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<Uri> for BaseUri {
    type Error = ApiError;

    fn try_from(value: Uri) -> Result<Self, Self::Error> {
        Self::from_uri(&value)
    }
}
