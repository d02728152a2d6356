//! Error types for the RCP remote.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use rcp_remote::{Result, Error};
//!
//! async fn example(connection: &mut WsConnection) -> Result<()> {
//!     connection.send_text(&Command::get(ParamId::RECORD_STATE).to_json()?).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Link | [`Error::Link`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::Handshake`], [`Error::AcceptMismatch`], [`Error::Tls`] |
//! | Protocol | [`Error::Frame`] |
//! | Device | [`Error::Device`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Url`] |
//!
//! A receive timeout is deliberately absent: it is reported as
//! [`Received::Timeout`](crate::transport::Received::Timeout), never as an error.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use url::ParseError as UrlError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Link Errors
    // ========================================================================
    /// Network link bring-up failed (e.g. Wi-Fi association).
    #[error("Network link failed: {message}")]
    Link {
        /// Description of the link failure.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Transport connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// WebSocket connection is closed.
    ///
    /// Returned when the camera closes the connection, or when an operation
    /// is attempted after [`close`](crate::transport::WsConnection::close).
    #[error("Connection closed")]
    ConnectionClosed,

    /// HTTP upgrade handshake failed.
    ///
    /// Returned when the status line is not `HTTP/1.1 101 ...` or the
    /// response is cut short.
    #[error("Handshake failed: {message}")]
    Handshake {
        /// Description of the handshake failure.
        message: String,
    },

    /// `Sec-WebSocket-Accept` did not match the key that was sent.
    ///
    /// Only returned under [`AcceptPolicy::Verify`](crate::config::AcceptPolicy::Verify).
    #[error("Sec-WebSocket-Accept mismatch: expected {expected}, got {actual:?}")]
    AcceptMismatch {
        /// Value derived from the request key.
        expected: String,
        /// Value sent by the server, if any.
        actual: Option<String>,
    },

    /// TLS setup or negotiation failed.
    #[error("TLS error: {message}")]
    Tls {
        /// Description of the TLS failure.
        message: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Malformed WebSocket frame.
    #[error("Frame error: {message}")]
    Frame {
        /// Description of the framing violation.
        message: String,
    },

    // ========================================================================
    // Device Errors
    // ========================================================================
    /// Indicator or input line failure.
    #[error("Device error ({device}): {message}")]
    Device {
        /// Device name.
        device: String,
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] UrlError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a network link error.
    #[inline]
    pub fn link(message: impl Into<String>) -> Self {
        Self::Link {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a handshake error.
    #[inline]
    pub fn handshake(message: impl Into<String>) -> Self {
        Self::Handshake {
            message: message.into(),
        }
    }

    /// Creates an accept-key mismatch error.
    #[inline]
    pub fn accept_mismatch(expected: impl Into<String>, actual: Option<String>) -> Self {
        Self::AcceptMismatch {
            expected: expected.into(),
            actual,
        }
    }

    /// Creates a TLS error.
    #[inline]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls {
            message: message.into(),
        }
    }

    /// Creates a frame error.
    #[inline]
    pub fn frame(message: impl Into<String>) -> Self {
        Self::Frame {
            message: message.into(),
        }
    }

    /// Creates a device error.
    #[inline]
    pub fn device(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Device {
            device: device.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::Handshake { .. }
                | Self::AcceptMismatch { .. }
                | Self::Tls { .. }
        )
    }

    /// Returns `true` if this error ends the session.
    ///
    /// There is no reconnect, so everything except a device read hiccup is
    /// fatal.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Device { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("refused");
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_handshake_error_display() {
        let err = Error::handshake("unexpected status line: HTTP/1.1 403 Forbidden");
        assert_eq!(
            err.to_string(),
            "Handshake failed: unexpected status line: HTTP/1.1 403 Forbidden"
        );
    }

    #[test]
    fn test_device_error_display() {
        let err = Error::device("button", "read failed");
        assert_eq!(err.to_string(), "Device error (button): read failed");
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(Error::handshake("test").is_connection_error());
        assert!(Error::accept_mismatch("abc", None).is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::ConnectionClosed.is_fatal());
        assert!(Error::frame("reserved bits").is_fatal());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(Error::from(json_err).is_fatal());
        assert!(!Error::device("touch", "transient").is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::TimedOut, "timed out");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_url_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::Url(_)));
    }
}
