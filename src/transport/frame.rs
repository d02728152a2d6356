//! WebSocket frame codec (RFC 6455 §5).
//!
//! Only what a minimal client needs: single-frame text sends, masked
//! client frames, control frames, and parsing of (possibly fragmented,
//! possibly masked) incoming frames.
//!
//! # Wire Layout
//!
//! ```text
//!  0               1               2               3
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |  ...          | Masking-key, if MASK set (32)                 |
//! +---------------+-------------------------------+---------------+
//! |                     Payload Data                              |
//! +---------------------------------------------------------------+
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

const FIN_BIT: u8 = 0x80;
const RSV_BITS: u8 = 0x70;
const OPCODE_BITS: u8 = 0x0F;
const MASK_BIT: u8 = 0x80;
const LEN_BITS: u8 = 0x7F;

/// Largest payload a control frame may carry.
pub const MAX_CONTROL_PAYLOAD: usize = 125;

/// Close status for a normal closure.
pub const CLOSE_NORMAL: u16 = 1000;

// ============================================================================
// OpCode
// ============================================================================

/// Frame opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Continuation of a fragmented message.
    Continuation,
    /// UTF-8 text data.
    Text,
    /// Binary data.
    Binary,
    /// Connection close.
    Close,
    /// Ping.
    Ping,
    /// Pong.
    Pong,
}

impl OpCode {
    /// Returns the 4-bit wire value.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Continuation => 0x0,
            Self::Text => 0x1,
            Self::Binary => 0x2,
            Self::Close => 0x8,
            Self::Ping => 0x9,
            Self::Pong => 0xA,
        }
    }

    /// Parses a 4-bit wire value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Frame`] for reserved opcodes.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x0 => Ok(Self::Continuation),
            0x1 => Ok(Self::Text),
            0x2 => Ok(Self::Binary),
            0x8 => Ok(Self::Close),
            0x9 => Ok(Self::Ping),
            0xA => Ok(Self::Pong),
            other => Err(Error::frame(format!("reserved opcode 0x{other:X}"))),
        }
    }

    /// Returns `true` for close, ping and pong.
    #[inline]
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(self, Self::Close | Self::Ping | Self::Pong)
    }
}

// ============================================================================
// Frame
// ============================================================================

/// A single WebSocket frame with an unmasked payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Final fragment of a message.
    pub fin: bool,
    /// Frame opcode.
    pub opcode: OpCode,
    /// Payload, already unmasked.
    pub payload: Vec<u8>,
}

// ============================================================================
// Constructors
// ============================================================================

impl Frame {
    /// Creates a final text frame.
    #[inline]
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            fin: true,
            opcode: OpCode::Text,
            payload: text.as_bytes().to_vec(),
        }
    }

    /// Creates a close frame carrying `code`.
    #[inline]
    #[must_use]
    pub fn close(code: u16) -> Self {
        Self {
            fin: true,
            opcode: OpCode::Close,
            payload: code.to_be_bytes().to_vec(),
        }
    }

    /// Creates a pong answering a ping with `payload`.
    #[inline]
    #[must_use]
    pub fn pong(payload: Vec<u8>) -> Self {
        Self {
            fin: true,
            opcode: OpCode::Pong,
            payload,
        }
    }

    /// Creates a ping.
    #[inline]
    #[must_use]
    pub fn ping(payload: Vec<u8>) -> Self {
        Self {
            fin: true,
            opcode: OpCode::Ping,
            payload,
        }
    }

    /// Status code of a close frame, if present.
    #[must_use]
    pub fn close_code(&self) -> Option<u16> {
        match (self.opcode, self.payload.as_slice()) {
            (OpCode::Close, [hi, lo, ..]) => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

impl Frame {
    /// Serializes the frame.
    ///
    /// Client frames must pass `Some(mask)`; server frames pass `None`.
    #[must_use]
    pub fn encode(&self, mask: Option<[u8; 4]>) -> Vec<u8> {
        let len = self.payload.len();
        let mut out = Vec::with_capacity(len + 14);

        let mut b0 = self.opcode.as_u8();
        if self.fin {
            b0 |= FIN_BIT;
        }
        out.push(b0);

        let mask_flag = if mask.is_some() { MASK_BIT } else { 0 };
        if len < 126 {
            out.push(mask_flag | len as u8);
        } else if let Ok(short) = u16::try_from(len) {
            out.push(mask_flag | 126);
            out.extend_from_slice(&short.to_be_bytes());
        } else {
            out.push(mask_flag | 127);
            out.extend_from_slice(&(len as u64).to_be_bytes());
        }

        match mask {
            Some(key) => {
                out.extend_from_slice(&key);
                out.extend(
                    self.payload
                        .iter()
                        .enumerate()
                        .map(|(i, byte)| byte ^ key[i % 4]),
                );
            }
            None => out.extend_from_slice(&self.payload),
        }

        out
    }
}

// ============================================================================
// Decoding
// ============================================================================

impl Frame {
    /// Parses one frame from the front of `buf`.
    ///
    /// Returns `Ok(None)` when `buf` does not yet hold a complete frame, or
    /// `Ok(Some((frame, consumed)))` with the number of bytes used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Frame`] for reserved bits, reserved opcodes,
    /// oversized or fragmented control frames, and payloads over
    /// `max_payload`.
    pub fn decode(buf: &[u8], max_payload: usize) -> Result<Option<(Self, usize)>> {
        let [b0, b1, ..] = *buf else {
            return Ok(None);
        };

        if b0 & RSV_BITS != 0 {
            return Err(Error::frame("reserved bits set without a negotiated extension"));
        }

        let fin = b0 & FIN_BIT != 0;
        let opcode = OpCode::from_u8(b0 & OPCODE_BITS)?;
        let masked = b1 & MASK_BIT != 0;

        let mut offset = 2;
        let len = match b1 & LEN_BITS {
            126 => {
                let Some(bytes) = buf.get(offset..offset + 2) else {
                    return Ok(None);
                };
                offset += 2;
                u64::from(u16::from_be_bytes([bytes[0], bytes[1]]))
            }
            127 => {
                let Some(bytes) = buf.get(offset..offset + 8) else {
                    return Ok(None);
                };
                offset += 8;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                let len = u64::from_be_bytes(raw);
                if len >> 63 != 0 {
                    return Err(Error::frame("64-bit length has the most significant bit set"));
                }
                len
            }
            short => u64::from(short),
        };

        if opcode.is_control() {
            if !fin {
                return Err(Error::frame("fragmented control frame"));
            }
            if len > MAX_CONTROL_PAYLOAD as u64 {
                return Err(Error::frame(format!("control frame payload of {len} bytes")));
            }
        }

        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= max_payload)
            .ok_or_else(|| {
                Error::frame(format!("payload of {len} bytes exceeds limit of {max_payload}"))
            })?;

        let mask = if masked {
            let Some(bytes) = buf.get(offset..offset + 4) else {
                return Ok(None);
            };
            offset += 4;
            Some([bytes[0], bytes[1], bytes[2], bytes[3]])
        } else {
            None
        };

        let Some(data) = buf.get(offset..offset + len) else {
            return Ok(None);
        };

        let payload = match mask {
            Some(key) => data
                .iter()
                .enumerate()
                .map(|(i, byte)| byte ^ key[i % 4])
                .collect(),
            None => data.to_vec(),
        };

        Ok(Some((
            Self {
                fin,
                opcode,
                payload,
            },
            offset + len,
        )))
    }
}

// ============================================================================
// Tests
// ============================================================================
