//! WebSocket connection to the camera.
//!
//! Owns the transport exclusively and exposes a small, pull-based API:
//! [`send_text`](WsConnection::send_text), [`receive`](WsConnection::receive),
//! [`receive_timeout`](WsConnection::receive_timeout) and
//! [`close`](WsConnection::close).
//!
//! # Receive Path
//!
//! Incoming bytes are accumulated in an internal buffer before being
//! parsed into frames. Dropping a pending `receive` future (as a timeout
//! does) therefore never loses part of a frame: the next call resumes from
//! the buffer.
//!
//! Control frames are handled inline:
//!
//! - Ping: answered with a pong, receive keeps waiting
//! - Pong: ignored
//! - Close: answered, connection moves to [`ConnectionState::Closed`]
//!
//! # Send Path
//!
//! Every outgoing frame is encoded into an outbox and drained with single
//! `write` calls, removing each chunk as soon as it is accepted. A write
//! interrupted by a timeout leaves the unwritten tail in the outbox, and
//! the next send, close or control reply finishes it before anything else
//! goes out. Frames never interleave on the wire.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::config::AcceptPolicy;
use crate::error::{Error, Result};

use super::frame::{CLOSE_NORMAL, Frame, OpCode};
use super::handshake::{self, HandshakeResponse};
use super::socket::{self, BoxedTransport};
use super::uri::Endpoint;

// ============================================================================
// Constants
// ============================================================================

/// Largest reassembled message accepted.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Initial receive buffer capacity.
const READ_CHUNK: usize = 4 * 1024;

// ============================================================================
// Types
// ============================================================================

/// Lifecycle of a [`WsConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport open, upgrade not finished.
    Connecting,
    /// Upgrade done; frames may flow.
    Open,
    /// Close sent or received, or the transport ended.
    Closed,
}

/// Outcome of a bounded receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// A complete message.
    Message(String),
    /// Nothing arrived within the bound.
    Timeout,
}

/// Message being reassembled from fragments.
struct Partial {
    opcode: OpCode,
    data: Vec<u8>,
}

// ============================================================================
// WsConnection
// ============================================================================

/// Client WebSocket connection.
pub struct WsConnection {
    /// Underlying byte stream.
    stream: BoxedTransport,
    /// Current lifecycle state.
    state: ConnectionState,
    /// Bytes read but not yet parsed.
    buffer: Vec<u8>,
    /// Encoded frames not yet accepted by the transport.
    outbox: Vec<u8>,
    /// Fragmented message in progress.
    partial: Option<Partial>,
    /// Upgrade response, kept for diagnostics.
    response: Option<HandshakeResponse>,
}

impl std::fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnection")
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .field("unsent", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

impl WsConnection {
    /// Opens a transport to `endpoint` and performs the upgrade.
    ///
    /// # Errors
    ///
    /// Any transport, TLS or handshake error. There is no retry.
    pub async fn connect(endpoint: &Endpoint, policy: AcceptPolicy) -> Result<Self> {
        let stream = socket::open(endpoint).await?;
        Self::handshake(stream, endpoint, policy).await
    }

    /// Performs the upgrade on an already-connected transport.
    ///
    /// # Errors
    ///
    /// - [`Error::Handshake`] for a non-101 response
    /// - [`Error::AcceptMismatch`] under [`AcceptPolicy::Verify`]
    pub async fn handshake(
        stream: BoxedTransport,
        endpoint: &Endpoint,
        policy: AcceptPolicy,
    ) -> Result<Self> {
        let mut connection = Self {
            stream,
            state: ConnectionState::Connecting,
            buffer: Vec::with_capacity(READ_CHUNK),
            outbox: Vec::new(),
            partial: None,
            response: None,
        };

        let response = handshake::perform(&mut connection.stream, endpoint, policy).await?;
        connection.response = Some(response);
        connection.state = ConnectionState::Open;

        debug!(endpoint = %endpoint, "WebSocket open");
        Ok(connection)
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns `true` while frames may be exchanged.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Returns the server's upgrade response.
    #[inline]
    #[must_use]
    pub fn handshake_response(&self) -> Option<&HandshakeResponse> {
        self.response.as_ref()
    }

    /// Sends `text` as a single masked text frame.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is not open
    /// - [`Error::Io`] if the write fails
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.ensure_open()?;
        self.write_frame(&Frame::text(text)).await?;
        trace!(len = text.len(), "Text frame sent");
        Ok(())
    }

    /// Waits for the next complete message.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] on a close frame or end of stream
    /// - [`Error::Frame`] on malformed frames or invalid UTF-8
    pub async fn receive(&mut self) -> Result<String> {
        self.ensure_open()?;

        loop {
            while let Some((frame, used)) = Frame::decode(&self.buffer, MAX_MESSAGE_SIZE)? {
                self.buffer.drain(..used);
                if let Some(message) = self.handle_frame(frame).await? {
                    return Ok(message);
                }
            }

            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                debug!("Transport ended");
                self.state = ConnectionState::Closed;
                return Err(Error::ConnectionClosed);
            }
        }
    }

    /// Waits at most `limit` for the next message.
    ///
    /// Running out of time is [`Received::Timeout`], not an error. A close
    /// frame seen before the limit still reports
    /// [`Error::ConnectionClosed`], even if answering it ran out of time.
    ///
    /// # Errors
    ///
    /// Same as [`receive`](Self::receive).
    pub async fn receive_timeout(&mut self, limit: Duration) -> Result<Received> {
        match timeout(limit, self.receive()).await {
            Ok(result) => result.map(Received::Message),
            Err(_) if self.state == ConnectionState::Closed => Err(Error::ConnectionClosed),
            Err(_) => Ok(Received::Timeout),
        }
    }

    /// Sends a close frame and releases the transport.
    ///
    /// Calling this on a closed connection does nothing.
    ///
    /// # Errors
    ///
    /// Returns the write error, if any; the connection is closed regardless.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }

        let result = self.write_frame(&Frame::close(CLOSE_NORMAL)).await;
        self.state = ConnectionState::Closed;

        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Transport shutdown failed");
        }

        debug!("WebSocket closed");
        result
    }
}

// ============================================================================
// Internals
// ============================================================================

impl WsConnection {
    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::ConnectionClosed)
        }
    }

    async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.queue_frame(frame);
        self.flush_outbox().await
    }

    fn queue_frame(&mut self, frame: &Frame) {
        let mask: [u8; 4] = rand::random();
        self.outbox.extend_from_slice(&frame.encode(Some(mask)));
    }

    /// Writes the outbox until it is empty.
    ///
    /// Cancel-safe: bytes leave the outbox only once the transport has
    /// accepted them. After a write error the outbox is discarded, since the
    /// transport may hold part of a frame.
    async fn flush_outbox(&mut self) -> Result<()> {
        while !self.outbox.is_empty() {
            let written = match self.stream.write(&self.outbox).await {
                Ok(0) => Err(std::io::Error::from(std::io::ErrorKind::WriteZero)),
                result => result,
            };
            match written {
                Ok(n) => {
                    self.outbox.drain(..n);
                }
                Err(e) => {
                    self.outbox.clear();
                    return Err(e.into());
                }
            }
        }
        self.stream.flush().await?;
        Ok(())
    }

    /// Handles one frame; returns a message once one is complete.
    async fn handle_frame(&mut self, frame: Frame) -> Result<Option<String>> {
        match frame.opcode {
            OpCode::Ping => {
                trace!(len = frame.payload.len(), "Ping received");
                self.write_frame(&Frame::pong(frame.payload)).await?;
                Ok(None)
            }

            OpCode::Pong => Ok(None),

            OpCode::Close => {
                let code = frame.close_code();
                debug!(?code, "Close frame received");

                self.state = ConnectionState::Closed;
                if let Err(e) = self.write_frame(&Frame::close(code.unwrap_or(CLOSE_NORMAL))).await {
                    warn!(error = %e, "Failed to answer close frame");
                }
                if let Err(e) = self.stream.shutdown().await {
                    debug!(error = %e, "Transport shutdown failed");
                }
                Err(Error::ConnectionClosed)
            }

            OpCode::Text | OpCode::Binary => {
                if self.partial.is_some() {
                    return Err(Error::frame("new message started inside a fragmented one"));
                }
                if frame.fin {
                    return finish(frame.opcode, frame.payload).map(Some);
                }
                self.partial = Some(Partial {
                    opcode: frame.opcode,
                    data: frame.payload,
                });
                Ok(None)
            }

            OpCode::Continuation => {
                let Some(partial) = self.partial.as_mut() else {
                    return Err(Error::frame("continuation frame without a message"));
                };
                if partial.data.len() + frame.payload.len() > MAX_MESSAGE_SIZE {
                    return Err(Error::frame("fragmented message exceeds size limit"));
                }
                partial.data.extend_from_slice(&frame.payload);

                if !frame.fin {
                    return Ok(None);
                }
                match self.partial.take() {
                    Some(partial) => finish(partial.opcode, partial.data).map(Some),
                    None => Ok(None),
                }
            }
        }
    }
}

/// Turns a reassembled payload into text.
fn finish(opcode: OpCode, data: Vec<u8>) -> Result<String> {
    match opcode {
        OpCode::Text => {
            String::from_utf8(data).map_err(|_| Error::frame("text message is not valid UTF-8"))
        }
        _ => Ok(String::from_utf8_lossy(&data).into_owned()),
    }
}

// ============================================================================
// Tests
// ============================================================================
