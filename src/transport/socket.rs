//! Transport socket: the byte stream under the WebSocket.
//!
//! Any `AsyncRead + AsyncWrite` stream can carry a session. [`open`] gives
//! the default: a TCP connection, TLS-wrapped for `wss` endpoints.

// ============================================================================
// Imports
// ============================================================================

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::uri::Endpoint;

// ============================================================================
// Transport
// ============================================================================

/// A bidirectional byte stream that can carry a WebSocket.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Transport for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Type-erased transport, plain or TLS.
pub type BoxedTransport = Box<dyn Transport>;

// ============================================================================
// Open
// ============================================================================

/// Connects to `endpoint`, wrapping in TLS when the scheme is `wss`.
///
/// # Errors
///
/// - [`Error::Connection`] if the TCP connect fails
/// - [`Error::Tls`] if the TLS handshake fails
/// - [`Error::Config`] for `wss` when built without the `tls` feature
pub async fn open(endpoint: &Endpoint) -> Result<BoxedTransport> {
    debug!(host = %endpoint.host, port = endpoint.port, "Opening transport");

    let tcp = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(|e| Error::connection(format!("{}: {e}", endpoint.socket_addr_string())))?;
    tcp.set_nodelay(true)?;

    if endpoint.scheme.is_secure() {
        let stream = tls::wrap(tcp, &endpoint.host).await?;
        info!(endpoint = %endpoint, "TLS transport connected");
        return Ok(stream);
    }

    info!(endpoint = %endpoint, "Transport connected");
    Ok(Box::new(tcp))
}

// ============================================================================
// TLS
// ============================================================================

#[cfg(feature = "tls")]
mod tls {
    use std::sync::Arc;

    use tokio::net::TcpStream;
    use tokio_rustls::TlsConnector;
    use tokio_rustls::rustls::pki_types::ServerName;
    use tokio_rustls::rustls::{ClientConfig, RootCertStore};

    use super::BoxedTransport;
    use crate::error::{Error, Result};

    /// Runs the TLS client handshake against the webpki trust store.
    pub(super) async fn wrap(tcp: TcpStream, host: &str) -> Result<BoxedTransport> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = TlsConnector::from(Arc::new(config));

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| Error::tls(format!("invalid server name '{host}': {e}")))?;

        let stream = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| Error::tls(e.to_string()))?;

        Ok(Box::new(stream))
    }
}

#[cfg(not(feature = "tls"))]
mod tls {
    use tokio::net::TcpStream;

    use super::BoxedTransport;
    use crate::error::{Error, Result};

    pub(super) async fn wrap(_tcp: TcpStream, _host: &str) -> Result<BoxedTransport> {
        Err(Error::config(
            "wss endpoints need the `tls` feature; rebuild with --features tls",
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
