//! Camera endpoint URI.
//!
//! Parses `ws://` / `wss://` URLs into the pieces the handshake needs.
//! The scheme decides whether the transport is TLS-wrapped.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Scheme
// ============================================================================

/// WebSocket URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain `ws://`.
    Ws,
    /// TLS-wrapped `wss://`.
    Wss,
}

impl Scheme {
    /// Port used when the URI does not name one.
    #[inline]
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Ws => 80,
            Self::Wss => 443,
        }
    }

    /// Returns `true` if the transport must be TLS-wrapped.
    #[inline]
    #[must_use]
    pub const fn is_secure(self) -> bool {
        matches!(self, Self::Wss)
    }

    /// Returns the scheme as written in a URI.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ws => "ws",
            Self::Wss => "wss",
        }
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// A parsed WebSocket endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `ws` or `wss`.
    pub scheme: Scheme,
    /// Host name or IP literal (IPv6 without brackets).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Request target: path plus optional query, never empty.
    pub path: String,
}

impl Endpoint {
    /// Parses an endpoint from a URL string.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] if the string is not a URL
    /// - [`Error::Config`] if the scheme is not `ws`/`wss` or the host is missing
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;

        let scheme = match url.scheme() {
            "ws" => Scheme::Ws,
            "wss" => Scheme::Wss,
            other => {
                return Err(Error::config(format!(
                    "unsupported endpoint scheme '{other}', expected ws or wss"
                )));
            }
        };

        let host = match url.host() {
            Some(url::Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => return Err(Error::config(format!("endpoint has no host: {input}"))),
        };

        let port = url.port().unwrap_or_else(|| scheme.default_port());

        let mut path = url.path().to_string();
        if path.is_empty() {
            path.push('/');
        }
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            scheme,
            host,
            port,
            path,
        })
    }

    /// Value of the `Host` header.
    #[must_use]
    pub fn host_header(&self) -> String {
        format!("{}:{}", self.bracketed_host(), self.port)
    }

    /// Value of the `Origin` header.
    ///
    /// Always `http://`, even for `wss` endpoints; the camera does not check it.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("http://{}:{}", self.bracketed_host(), self.port)
    }

    /// Returns `host:port` suitable for socket resolution.
    #[must_use]
    pub fn socket_addr_string(&self) -> String {
        self.host_header()
    }

    fn bracketed_host(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.bracketed_host(),
            self.port,
            self.path
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
