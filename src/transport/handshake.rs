//! HTTP/1.1 Upgrade handshake (client side).
//!
//! # Exchange
//!
//! ```text
//! GET /rcp HTTP/1.1
//! Host: 192.168.1.50:9998
//! Connection: Upgrade
//! Upgrade: websocket
//! Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==
//! Sec-WebSocket-Version: 13
//! Origin: http://192.168.1.50:9998
//!
//! HTTP/1.1 101 Switching Protocols
//! ...headers...
//!
//! ```
//!
//! The response is read one byte at a time so that nothing past the blank
//! line is consumed; the first frame may follow immediately.

// ============================================================================
// Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;
use tracing::{debug, trace};

use crate::config::AcceptPolicy;
use crate::error::{Error, Result};

use super::uri::Endpoint;

// ============================================================================
// Constants
// ============================================================================

/// Required prefix of the response status line.
const SWITCHING_PROTOCOLS: &str = "HTTP/1.1 101 ";

/// Longest header line accepted.
const MAX_LINE_LEN: usize = 8 * 1024;

/// Most header lines accepted.
const MAX_HEADERS: usize = 64;

/// Length of the raw key before base64.
pub const KEY_LEN: usize = 16;

// ============================================================================
// HandshakeResponse
// ============================================================================

/// What the server sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    /// Full status line without CRLF.
    pub status_line: String,
    /// Header lines split at the first `:`, values trimmed.
    pub headers: Vec<(String, String)>,
}

impl HandshakeResponse {
    /// Looks up a header by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// ============================================================================
// Request
// ============================================================================

/// Generates a fresh `Sec-WebSocket-Key`: 16 random bytes, base64-encoded.
#[must_use]
pub fn generate_key() -> String {
    let raw: [u8; KEY_LEN] = rand::random();
    BASE64.encode(raw)
}

/// Builds the upgrade request, CRLF line endings, blank-line terminated.
#[must_use]
pub fn build_request(endpoint: &Endpoint, key: &str) -> String {
    let lines = [
        format!("GET {} HTTP/1.1", endpoint.path),
        format!("Host: {}", endpoint.host_header()),
        "Connection: Upgrade".to_string(),
        "Upgrade: websocket".to_string(),
        format!("Sec-WebSocket-Key: {key}"),
        "Sec-WebSocket-Version: 13".to_string(),
        format!("Origin: {}", endpoint.origin()),
    ];

    let mut request = String::new();
    for line in lines {
        trace!(%line, "Handshake request line");
        request.push_str(&line);
        request.push_str("\r\n");
    }
    request.push_str("\r\n");
    request
}

// ============================================================================
// Handshake
// ============================================================================

/// Performs the upgrade on `stream`.
///
/// # Errors
///
/// - [`Error::Handshake`] if the status line is not `HTTP/1.1 101 ...`,
///   or the stream ends before the blank line
/// - [`Error::AcceptMismatch`] under [`AcceptPolicy::Verify`] when the
///   accept header is wrong or absent
/// - [`Error::Io`] on transport failure
pub async fn perform<S>(
    stream: &mut S,
    endpoint: &Endpoint,
    policy: AcceptPolicy,
) -> Result<HandshakeResponse>
where
    S: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    let key = generate_key();
    let request = build_request(endpoint, &key);

    stream.write_all(request.as_bytes()).await?;
    stream.flush().await?;

    let response = read_response(stream).await?;

    if policy == AcceptPolicy::Verify {
        verify_accept(&key, &response)?;
    }

    debug!(status = %response.status_line, headers = response.headers.len(), "Handshake completed");
    Ok(response)
}

/// Reads the status line and headers up to the blank line.
async fn read_response<S>(stream: &mut S) -> Result<HandshakeResponse>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let status_line = read_line(stream)
        .await?
        .ok_or_else(|| Error::handshake("connection closed before status line"))?;

    if !status_line.starts_with(SWITCHING_PROTOCOLS) {
        return Err(Error::handshake(format!(
            "unexpected status line: {status_line}"
        )));
    }

    let mut headers = Vec::new();
    loop {
        let line = read_line(stream)
            .await?
            .ok_or_else(|| Error::handshake("connection closed inside response headers"))?;
        if line.is_empty() {
            break;
        }
        if headers.len() == MAX_HEADERS {
            return Err(Error::handshake("too many response headers"));
        }

        trace!(%line, "Handshake response header");
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok(HandshakeResponse {
        status_line,
        headers,
    })
}

/// Reads one CRLF-terminated line, one byte at a time.
///
/// Returns `None` if the stream ends before a terminator.
async fn read_line<S>(stream: &mut S) -> Result<Option<String>>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut line = Vec::new();
    loop {
        let mut byte = [0u8; 1];
        if stream.read(&mut byte).await? == 0 {
            return Ok(None);
        }
        line.push(byte[0]);

        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }
        if line.len() > MAX_LINE_LEN {
            return Err(Error::handshake("response line too long"));
        }
    }
}

/// Checks `Sec-WebSocket-Accept` against the key that was sent.
fn verify_accept(key: &str, response: &HandshakeResponse) -> Result<()> {
    let expected = derive_accept_key(key.as_bytes());
    match response.header("Sec-WebSocket-Accept") {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(Error::accept_mismatch(expected, actual.map(str::to_string))),
    }
}

// ============================================================================
// Tests
// ============================================================================
