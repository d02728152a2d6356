//! RCP Remote - a hardware remote for cameras speaking RCP over WebSocket.
//!
//! This library drives a camera's record state from a physical button (and
//! optionally a touch pad) and mirrors that state on an RGB indicator.
//!
//! # Architecture
//!
//! The remote is a client of the camera's RCP service:
//!
//! - **Local End (Rust)**: Polls inputs, sends `rcp_*` commands, shows state
//! - **Remote End (Camera)**: Executes commands, pushes status updates
//!
//! Key design principles:
//!
//! - One session owns: WebSocket connection + indicator + input channels
//! - Single-threaded, cooperative polling loop (no spawned tasks)
//! - Receive timeouts are a typed outcome, not an error
//! - Hardware is injected through traits; nothing is a global
//!
//! # Quick Start
//!
//! ```no_run
//! use rcp_remote::device::{LogIndicator, PreassociatedLink, SysfsInput};
//! use rcp_remote::gesture::{InputChannel, Polarity};
//! use rcp_remote::{SessionOptions, Result, session};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let options = SessionOptions::for_camera("192.168.0.100")?;
//!     let mut link = PreassociatedLink::new(options.endpoint.clone());
//!
//!     let button = InputChannel::button(
//!         "button",
//!         SysfsInput::gpio(17),
//!         Polarity::ActiveLow,
//!         &options.timing,
//!     );
//!
//!     let end = session::run(&options, &mut link, LogIndicator::new(), vec![button]).await?;
//!     println!("session ended after {} iterations", end.iterations);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Session options and builder |
//! | [`device`] | Indicator, input line and network link traits |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`gesture`] | Press counting and touch toggling |
//! | [`indicator`] | Record state to color mapping |
//! | [`protocol`] | RCP message types |
//! | [`session`] | Bootstrap and control loop |
//! | [`transport`] | WebSocket client over TCP or TLS |
//!
//! # Features
//!
//! - **tls** (default): `wss://` endpoints via rustls and the webpki roots

// ============================================================================
// Modules
// ============================================================================

/// Session configuration.
///
/// Use [`SessionBuilder`] or [`SessionOptions::from_env`].
pub mod config;

/// Hardware collaborators.
pub mod device;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Input gesture recognition.
pub mod gesture;

/// Indicator state mapping.
pub mod indicator;

/// RCP protocol message types.
pub mod protocol;

/// Session orchestration.
pub mod session;

/// WebSocket transport layer.
///
/// Handshake, framing and the byte stream underneath.
pub mod transport;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::{AcceptPolicy, Credentials, SessionBuilder, SessionOptions, Timing};

// Devices
pub use device::{Color, Indicator, InputLine, NetworkLink};

// Error types
pub use error::{Error, Result};

// Gestures
pub use gesture::{Action, InputChannel, Polarity, PressActions};

// Indicator
pub use indicator::{RecordState, map_state};

// Protocol
pub use protocol::{Command, ParamId, SetValue, StatusEvent};

// Session
pub use session::{ControlLoop, Flow, Session, SessionEnd};

// Transport
pub use transport::{Endpoint, Received, WsConnection};
