//! WebSocket transport layer.
//!
//! A minimal WebSocket client, just enough to carry RCP: the HTTP upgrade,
//! masked text frames out, (fragmented) frames in, and a bounded receive.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  ControlLoop    │                              │  Camera         │
//! │                 │         WebSocket            │                 │
//! │  WsConnection   │◄────────────────────────────►│  RCP server     │
//! │  → Transport    │      <camera-ip>:9998/rcp    │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `socket::open` - TCP connect, TLS-wrap for `wss`
//! 2. `handshake::perform` - HTTP/1.1 Upgrade, expect `101`
//! 3. `WsConnection` - send text, receive with a bound
//! 4. `WsConnection::close` - close frame, release transport
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Frame exchange and connection state |
//! | `frame` | RFC 6455 frame codec |
//! | `handshake` | HTTP upgrade request/response |
//! | `socket` | Transport trait and TCP/TLS opener |
//! | `uri` | `ws://` / `wss://` endpoint parsing |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection.
pub mod connection;

/// Frame codec.
pub mod frame;

/// HTTP upgrade handshake.
pub mod handshake;

/// Transport socket.
pub mod socket;

/// Endpoint URI.
pub mod uri;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{ConnectionState, Received, WsConnection};
pub use handshake::HandshakeResponse;
pub use socket::{BoxedTransport, Transport};
pub use uri::{Endpoint, Scheme};
