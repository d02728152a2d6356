//! Session orchestration: bootstrap and the control loop.
//!
//! # Lifecycle
//!
//! ```text
//! NetworkLink::connect ─► socket::open ─► Session::connect ─► Session::start ─► ControlLoop::run
//!                                          │                    │
//!                                          │ handshake          │ brightness
//!                                          │ rcp_config + ack   │ initial color
//!                                          │ rcp_get RECORD_STATE
//! ```
//!
//! [`run`] chains all of it. There is no retry: any failure before the
//! loop ends the session.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `control` | The polling loop |
//! | `state` | Cached camera state |

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, info};

use crate::config::{SessionOptions, Timing};
use crate::device::{Indicator, NetworkLink};
use crate::error::Result;
use crate::gesture::InputChannel;
use crate::indicator::apply_state;
use crate::protocol::{Command, ParamId, StatusEvent, status};
use crate::transport::{BoxedTransport, WsConnection, socket};

// ============================================================================
// Submodules
// ============================================================================

/// Control loop.
pub mod control;

/// Camera state cache.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use control::{ControlLoop, Flow, SessionEnd};
pub use state::CameraState;

// ============================================================================
// Session
// ============================================================================

/// A bootstrapped session, ready to start its loop.
#[derive(Debug)]
pub struct Session {
    connection: WsConnection,
    initial: StatusEvent,
    brightness: f32,
    timing: Timing,
}

impl Session {
    /// Runs the bootstrap over `transport`.
    ///
    /// Upgrade, send `rcp_config`, discard one reply, send
    /// `rcp_get RECORD_STATE` and decode the reply.
    ///
    /// # Errors
    ///
    /// Handshake, send and receive errors, and [`Error::Json`](crate::Error::Json)
    /// if the record state reply is not JSON.
    pub async fn connect(options: &SessionOptions, transport: BoxedTransport) -> Result<Self> {
        let mut connection = WsConnection::handshake(transport, &options.endpoint, options.accept_policy).await?;

        connection
            .send_text(&Command::config(options.client_name.as_str()).to_json()?)
            .await?;
        let ack = connection.receive().await?;
        debug!(len = ack.len(), "Config acknowledged");

        connection
            .send_text(&Command::get(ParamId::RECORD_STATE).to_json()?)
            .await?;
        let reply = connection.receive().await?;
        let initial = status::decode(&reply)?;
        debug!(id = ?initial.id, value = ?initial.value, "Initial status");

        info!(endpoint = %options.endpoint, "Session established");
        Ok(Self {
            connection,
            initial,
            brightness: options.brightness,
            timing: options.timing,
        })
    }

    /// The status received during bootstrap.
    #[inline]
    #[must_use]
    pub const fn initial_status(&self) -> &StatusEvent {
        &self.initial
    }

    /// Initializes `indicator` and hands everything to a [`ControlLoop`].
    ///
    /// The initial color is only applied if the bootstrap reply was about
    /// `RECORD_STATE`.
    ///
    /// # Errors
    ///
    /// Returns the indicator's error if it cannot be initialized.
    pub fn start<I: Indicator>(self, mut indicator: I, channels: Vec<InputChannel>) -> Result<ControlLoop<I>> {
        indicator.set_brightness(self.brightness)?;

        let mut state = CameraState::new();
        if self.initial.is(&ParamId::RECORD_STATE) {
            if let Some(record) = apply_state(&mut indicator, self.initial.value.as_ref())? {
                state.set_record(record);
            }
        } else {
            debug!(id = ?self.initial.id, "Bootstrap reply not about record state");
        }

        Ok(ControlLoop::new(self.connection, indicator, channels, state, self.timing))
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Brings the link up, connects, bootstraps and runs the loop to the end.
///
/// # Errors
///
/// The first fatal error from any stage.
pub async fn run<L, I>(
    options: &SessionOptions,
    link: &mut L,
    indicator: I,
    channels: Vec<InputChannel>,
) -> Result<SessionEnd>
where
    L: NetworkLink + ?Sized,
    I: Indicator,
{
    let local = link.connect(&options.credentials).await?;
    info!(%local, "Network link up");

    let transport = socket::open(&options.endpoint).await?;
    let session = Session::connect(options, transport).await?;
    session.start(indicator, channels)?.run().await
}

// ============================================================================
// Tests
// ============================================================================
