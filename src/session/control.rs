//! The cooperative control loop.
//!
//! One iteration, repeated until the session ends:
//!
//! 1. Receive for at most `receive_poll`; dispatch a status update if one
//!    arrived. A timeout is the common case and does nothing.
//! 2. Poll every input channel in order and perform the resulting actions.
//! 3. Sleep `loop_interval`.
//!
//! A command triggered in iteration N is written before the receive of
//! iteration N+1. The loop never waits for the camera's echo.
//!
//! # Failure Handling
//!
//! | Failure | Handling |
//! |---------|----------|
//! | Receive timeout | Ignored |
//! | Outbound command cannot be sent | Logged, counted as dropped |
//! | Indicator write fails | Logged |
//! | Malformed status JSON | Fatal |
//! | Camera closes the connection | Fatal |
//!
//! Fatal errors force the indicator off before being returned.

// ============================================================================
// Imports
// ============================================================================

use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::config::Timing;
use crate::device::Indicator;
use crate::error::Result;
use crate::gesture::{Action, InputChannel};
use crate::indicator::apply_state;
use crate::protocol::{Command, ParamId, SetValue, status};
use crate::transport::{Received, WsConnection};

use super::state::CameraState;

// ============================================================================
// Types
// ============================================================================

/// Whether the loop keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run another iteration.
    Continue,
    /// The session ended cleanly.
    Terminate,
}

/// Statistics for a finished (or running) session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionEnd {
    /// Iterations started.
    pub iterations: u64,
    /// Commands written to the connection.
    pub commands_sent: u64,
    /// Commands lost to serialization or send failures.
    pub commands_dropped: u64,
    /// Status messages decoded.
    pub status_events: u64,
}

// ============================================================================
// ControlLoop
// ============================================================================

/// Owns the connection, the indicator and the input channels of a session.
pub struct ControlLoop<I> {
    connection: WsConnection,
    indicator: I,
    channels: Vec<InputChannel>,
    state: CameraState,
    timing: Timing,
    stats: SessionEnd,
}

impl<I> std::fmt::Debug for ControlLoop<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("connection", &self.connection)
            .field("channels", &self.channels)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<I: Indicator> ControlLoop<I> {
    /// Assembles a loop from an open connection.
    ///
    /// Every parameter a channel can toggle is registered in `state`.
    #[must_use]
    pub fn new(
        connection: WsConnection,
        indicator: I,
        channels: Vec<InputChannel>,
        mut state: CameraState,
        timing: Timing,
    ) -> Self {
        for param in channels.iter().flat_map(|channel| channel.toggled_params()) {
            state.track(param.clone());
        }

        Self {
            connection,
            indicator,
            channels,
            state,
            timing,
            stats: SessionEnd::default(),
        }
    }

    /// Cached camera state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &CameraState {
        &self.state
    }

    /// Statistics so far.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> SessionEnd {
        self.stats
    }

    /// The indicator.
    #[inline]
    #[must_use]
    pub const fn indicator(&self) -> &I {
        &self.indicator
    }

    /// The connection.
    #[inline]
    #[must_use]
    pub const fn connection(&self) -> &WsConnection {
        &self.connection
    }

    /// Runs until the session ends.
    ///
    /// # Errors
    ///
    /// The first fatal error from [`step`](Self::step).
    pub async fn run(mut self) -> Result<SessionEnd> {
        info!(channels = self.channels.len(), "Control loop started");

        while self.step().await? == Flow::Continue {}

        info!(
            iterations = self.stats.iterations,
            sent = self.stats.commands_sent,
            dropped = self.stats.commands_dropped,
            "Control loop finished"
        );
        Ok(self.stats)
    }

    /// Runs exactly one iteration.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if the camera went away
    /// - [`Error::Json`](crate::Error::Json) on a malformed status message
    /// - [`Error::Frame`](crate::Error::Frame) on a protocol violation
    pub async fn step(&mut self) -> Result<Flow> {
        match self.iterate().await {
            Ok(flow) => Ok(flow),
            Err(e) => {
                error!(error = %e, "Session failed");
                self.abort().await;
                Err(e)
            }
        }
    }
}

// ============================================================================
// Internals
// ============================================================================

impl<I: Indicator> ControlLoop<I> {
    async fn iterate(&mut self) -> Result<Flow> {
        self.stats.iterations += 1;

        if let Received::Message(text) = self.connection.receive_timeout(self.timing.receive_poll).await? {
            self.dispatch(&text)?;
        }

        let now = Instant::now();
        for index in 0..self.channels.len() {
            let Some(action) = self.channels[index].poll(now) else {
                continue;
            };
            if self.perform(action).await == Flow::Terminate {
                return Ok(Flow::Terminate);
            }
        }

        sleep(self.timing.loop_interval).await;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, text: &str) -> Result<()> {
        let event = status::decode(text)?;
        self.stats.status_events += 1;

        let Some(id) = event.id.as_ref() else {
            debug!("Status without id");
            return Ok(());
        };

        if *id == ParamId::RECORD_STATE {
            match apply_state(&mut self.indicator, event.value.as_ref()) {
                Ok(Some(state)) => self.state.set_record(state),
                Ok(None) => {}
                Err(e) if !e.is_fatal() => warn!(error = %e, "Indicator update failed"),
                Err(e) => return Err(e),
            }
        } else if self.state.is_tracked(id) {
            if let Some(on) = event.value_flag() {
                self.state.set_flag(id, on);
                debug!(param = %id, on, "Tracked parameter updated");
            }
        }

        Ok(())
    }

    async fn perform(&mut self, action: Action) -> Flow {
        match action {
            Action::ToggleRecord => {
                info!("Toggling record state");
                self.send(Command::set(ParamId::RECORD_STATE, SetValue::toggle())).await;
                Flow::Continue
            }
            Action::ToggleParam(param) => {
                let on = self.state.toggle(&param);
                info!(param = %param, on, "Toggling parameter");
                self.send(Command::set(param, SetValue::flag(on))).await;
                Flow::Continue
            }
            Action::EndSession => {
                info!("Ending session");
                if let Err(e) = self.connection.close().await {
                    warn!(error = %e, "Close failed");
                }
                self.indicator_off();
                Flow::Terminate
            }
            Action::Ignore => Flow::Continue,
        }
    }

    async fn send(&mut self, command: Command) {
        let result = match command.to_json() {
            Ok(json) => self.connection.send_text(&json).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => self.stats.commands_sent += 1,
            Err(e) => {
                warn!(kind = command.kind(), error = %e, "Command dropped");
                self.stats.commands_dropped += 1;
            }
        }
    }

    async fn abort(&mut self) {
        if let Err(e) = self.connection.close().await {
            debug!(error = %e, "Close after failure");
        }
        self.indicator_off();
    }

    fn indicator_off(&mut self) {
        if let Err(e) = self.indicator.off() {
            warn!(error = %e, "Indicator off failed");
        }
    }
}
