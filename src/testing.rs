//! Test doubles: a scripted camera on the far end of an in-memory pipe,
//! a transport whose writes can be broken, a recording indicator and
//! scriptable input lines.

// ============================================================================
// Imports
// ============================================================================

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream, ReadBuf, duplex};
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;

use crate::device::{Color, Indicator, InputLine};
use crate::error::Result;
use crate::transport::frame::Frame;
use crate::transport::{BoxedTransport, connection::MAX_MESSAGE_SIZE};

// ============================================================================
// FakeCamera
// ============================================================================

/// Server side of a WebSocket session over [`tokio::io::duplex`].
pub(crate) struct FakeCamera {
    stream: DuplexStream,
    buffer: Vec<u8>,
}

impl FakeCamera {
    /// Creates a connected (client transport, camera) pair.
    pub(crate) fn pair() -> (BoxedTransport, Self) {
        Self::pair_with_capacity(64 * 1024)
    }

    /// Like [`pair`](Self::pair), with `capacity` bytes of buffering in
    /// each direction.
    pub(crate) fn pair_with_capacity(capacity: usize) -> (BoxedTransport, Self) {
        let (client, server) = duplex(capacity);
        (
            Box::new(client),
            Self {
                stream: server,
                buffer: Vec::new(),
            },
        )
    }

    /// Like [`pair`](Self::pair), but the client's writes start failing
    /// once the returned [`WriteSwitch`] is flipped. Reads keep working.
    pub(crate) fn pair_with_write_switch() -> (BoxedTransport, Self, WriteSwitch) {
        let (transport, camera) = Self::pair();
        let switch = WriteSwitch::default();
        let transport = SwitchedTransport {
            inner: transport,
            switch: switch.clone(),
        };
        (Box::new(transport), camera, switch)
    }

    /// Reads the upgrade request and answers 101 with the correct accept key.
    pub(crate) async fn accept_handshake(&mut self) -> String {
        let request = self.read_request().await;
        let accept = derive_accept_key(request_key(&request).as_bytes());
        self.write_response(&accept).await;
        request
    }

    /// Reads the upgrade request and answers 101 with `accept` verbatim.
    pub(crate) async fn accept_handshake_with_key(&mut self, accept: &str) -> String {
        let request = self.read_request().await;
        self.write_response(accept).await;
        request
    }

    /// Reads the upgrade request and answers with `status_line`.
    pub(crate) async fn reject_handshake(&mut self, status_line: &str) -> String {
        let request = self.read_request().await;
        self.send_raw(format!("{status_line}\r\nContent-Length: 0\r\n\r\n").as_bytes())
            .await;
        request
    }

    /// Sends an unmasked text frame.
    pub(crate) async fn send_text(&mut self, text: &str) {
        self.send_frame(Frame::text(text)).await;
    }

    /// Sends an unmasked frame.
    pub(crate) async fn send_frame(&mut self, frame: Frame) {
        self.send_raw(&frame.encode(None)).await;
    }

    /// Writes raw bytes.
    pub(crate) async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.expect("camera write");
        self.stream.flush().await.expect("camera flush");
    }

    /// Reads the next client frame, asserting it is masked.
    pub(crate) async fn recv_frame(&mut self) -> Frame {
        loop {
            if self.buffer.len() >= 2 {
                assert!(self.buffer[1] & 0x80 != 0, "client frame must be masked");
            }
            if let Some((frame, used)) =
                Frame::decode(&self.buffer, MAX_MESSAGE_SIZE).expect("client frame")
            {
                self.buffer.drain(..used);
                return frame;
            }
            let n = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .expect("camera read");
            assert!(n > 0, "client hung up");
        }
    }

    /// Reads the next client frame as text.
    pub(crate) async fn recv_text(&mut self) -> String {
        let frame = self.recv_frame().await;
        String::from_utf8(frame.payload).expect("utf-8 payload")
    }

    async fn read_request(&mut self) -> String {
        let mut request = Vec::new();
        while !request.ends_with(b"\r\n\r\n") {
            let byte = self.stream.read_u8().await.expect("request byte");
            request.push(byte);
        }
        String::from_utf8(request).expect("ascii request")
    }

    async fn write_response(&mut self, accept: &str) {
        let response = format!(
            "HTTP/1.1 101 Switching Protocols\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Accept: {accept}\r\n\
             \r\n"
        );
        self.send_raw(response.as_bytes()).await;
    }
}

fn request_key(request: &str) -> String {
    request
        .lines()
        .find_map(|line| line.strip_prefix("Sec-WebSocket-Key: "))
        .expect("key header")
        .trim()
        .to_string()
}

// ============================================================================
// SwitchedTransport
// ============================================================================

/// Breaks the write half of a [`SwitchedTransport`].
#[derive(Debug, Clone, Default)]
pub(crate) struct WriteSwitch {
    broken: Arc<AtomicBool>,
}

impl WriteSwitch {
    pub(crate) fn break_writes(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    fn is_broken(&self) -> bool {
        self.broken.load(Ordering::SeqCst)
    }
}

struct SwitchedTransport {
    inner: BoxedTransport,
    switch: WriteSwitch,
}

impl AsyncRead for SwitchedTransport {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for SwitchedTransport {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.switch.is_broken() {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "write half closed")));
        }
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

// ============================================================================
// RecordingIndicator
// ============================================================================

/// Everything an indicator was told to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum IndicatorCall {
    Color(Color),
    Brightness(f32),
    Off,
}

/// Indicator that records calls into a shared log.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingIndicator {
    calls: Arc<Mutex<Vec<IndicatorCall>>>,
}

impl RecordingIndicator {
    pub(crate) fn calls(&self) -> Vec<IndicatorCall> {
        self.calls.lock().clone()
    }

    /// Last color shown, `None` if off or never set.
    pub(crate) fn current(&self) -> Option<Color> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            IndicatorCall::Color(color) => Some(Some(*color)),
            IndicatorCall::Off => Some(None),
            IndicatorCall::Brightness(_) => None,
        })?
    }
}

impl Indicator for RecordingIndicator {
    fn set_color(&mut self, color: Color) -> Result<()> {
        self.calls.lock().push(IndicatorCall::Color(color));
        Ok(())
    }

    fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        self.calls.lock().push(IndicatorCall::Brightness(brightness));
        Ok(())
    }

    fn off(&mut self) -> Result<()> {
        self.calls.lock().push(IndicatorCall::Off);
        Ok(())
    }
}

// ============================================================================
// ScriptedInput
// ============================================================================

/// Input line whose level the test flips from outside.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedInput {
    level: Arc<AtomicBool>,
}

impl ScriptedInput {
    pub(crate) fn set(&self, level: bool) {
        self.level.store(level, Ordering::SeqCst);
    }
}

impl InputLine for ScriptedInput {
    fn read(&mut self) -> Result<bool> {
        Ok(self.level.load(Ordering::SeqCst))
    }
}
