//! Input gestures: from raw line levels to session actions.
//!
//! Each [`InputChannel`] owns one [`InputLine`], applies its polarity and
//! feeds the corrected level into a recognizer:
//!
//! | Recognizer | Gesture | Default action |
//! |------------|---------|----------------|
//! | [`PressCounter`] | single press | [`Action::ToggleRecord`] |
//! | [`PressCounter`] | double press | [`Action::EndSession`] |
//! | [`PressCounter`] | three or more | [`Action::Ignore`] |
//! | [`TouchToggle`] | rising edge | [`Action::ToggleParam`] |
//!
//! Channels never block. Timing is taken from the `now` passed to
//! [`InputChannel::poll`], so tests can drive them with a paused clock.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `press` | Press-count state machine |
//! | `toggle` | Rising-edge toggle with hold-off |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::Timing;
use crate::device::InputLine;
use crate::protocol::ParamId;

// ============================================================================
// Submodules
// ============================================================================

/// Press counting.
pub mod press;

/// Touch toggling.
pub mod toggle;

// ============================================================================
// Re-exports
// ============================================================================

pub use press::{PressCounter, PressGesture};
pub use toggle::TouchToggle;

// ============================================================================
// Polarity
// ============================================================================

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// High level is pressed.
    #[default]
    ActiveHigh,
    /// Low level is pressed (pulled-up button to ground).
    ActiveLow,
}

impl Polarity {
    /// Converts a raw level into "pressed".
    #[inline]
    #[must_use]
    pub const fn apply(self, level: bool) -> bool {
        match self {
            Self::ActiveHigh => level,
            Self::ActiveLow => !level,
        }
    }
}

// ============================================================================
// Action
// ============================================================================

/// What the control loop does in response to a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Send `rcp_set RECORD_STATE 2`.
    ToggleRecord,
    /// Close the connection, turn the indicator off and stop.
    EndSession,
    /// Flip a boolean camera parameter.
    ToggleParam(ParamId),
    /// Do nothing.
    Ignore,
}

/// Actions bound to each press count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressActions {
    /// One press.
    pub single: Action,
    /// Two presses.
    pub double: Action,
    /// Three or more presses.
    pub many: Action,
}

impl PressActions {
    /// Looks up the action for `gesture`.
    #[must_use]
    pub fn for_gesture(&self, gesture: PressGesture) -> &Action {
        match gesture {
            PressGesture::Single => &self.single,
            PressGesture::Double => &self.double,
            PressGesture::Many(_) => &self.many,
        }
    }
}

impl Default for PressActions {
    fn default() -> Self {
        Self {
            single: Action::ToggleRecord,
            double: Action::EndSession,
            many: Action::Ignore,
        }
    }
}

// ============================================================================
// Recognizer
// ============================================================================

/// Gesture recognizer owned by a channel.
#[derive(Debug, Clone)]
pub enum Recognizer {
    /// Press counting with per-count actions.
    Press {
        /// State machine.
        counter: PressCounter,
        /// Bindings.
        actions: PressActions,
    },
    /// Rising-edge toggle.
    Toggle {
        /// Edge detector.
        toggle: TouchToggle,
        /// Action fired on each toggle.
        action: Action,
    },
}

// ============================================================================
// InputChannel
// ============================================================================

/// One input line with its recognizer.
pub struct InputChannel {
    /// Name used in logs.
    name: String,
    /// Line being sampled.
    line: Box<dyn InputLine>,
    /// Level meaning pressed.
    polarity: Polarity,
    /// Recognizer state.
    recognizer: Recognizer,
}

impl fmt::Debug for InputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputChannel")
            .field("name", &self.name)
            .field("polarity", &self.polarity)
            .field("recognizer", &self.recognizer)
            .finish_non_exhaustive()
    }
}

impl InputChannel {
    /// Creates a button channel with the default press bindings.
    #[must_use]
    pub fn button(
        name: impl Into<String>,
        line: impl InputLine + 'static,
        polarity: Polarity,
        timing: &Timing,
    ) -> Self {
        Self {
            name: name.into(),
            line: Box::new(line),
            polarity,
            recognizer: Recognizer::Press {
                counter: PressCounter::new(timing.double_press_window),
                actions: PressActions::default(),
            },
        }
    }

    /// Creates a touch channel that toggles `param`.
    #[must_use]
    pub fn touch(
        name: impl Into<String>,
        line: impl InputLine + 'static,
        polarity: Polarity,
        param: ParamId,
        timing: &Timing,
    ) -> Self {
        Self {
            name: name.into(),
            line: Box::new(line),
            polarity,
            recognizer: Recognizer::Toggle {
                toggle: TouchToggle::new(timing.touch_holdoff),
                action: Action::ToggleParam(param),
            },
        }
    }

    /// Replaces the press bindings. No effect on touch channels.
    #[must_use]
    pub fn with_press_actions(mut self, bindings: PressActions) -> Self {
        if let Recognizer::Press { actions, .. } = &mut self.recognizer {
            *actions = bindings;
        }
        self
    }

    /// Channel name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recognizer state.
    #[inline]
    #[must_use]
    pub const fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// Camera parameters this channel can toggle.
    pub fn toggled_params(&self) -> impl Iterator<Item = &ParamId> + '_ {
        let bound: Vec<&Action> = match &self.recognizer {
            Recognizer::Press { actions, .. } => vec![&actions.single, &actions.double, &actions.many],
            Recognizer::Toggle { action, .. } => vec![action],
        };
        bound.into_iter().filter_map(|action| match action {
            Action::ToggleParam(param) => Some(param),
            _ => None,
        })
    }

    /// Samples the line once and returns the action to take, if any.
    ///
    /// A failed read is logged and treated as "no edge"; pending press
    /// counts still resolve.
    pub fn poll(&mut self, now: Instant) -> Option<Action> {
        let level = match self.line.read() {
            Ok(level) => Some(self.polarity.apply(level)),
            Err(e) => {
                warn!(channel = %self.name, error = %e, "Input read failed");
                None
            }
        };

        let action = match &mut self.recognizer {
            Recognizer::Press { counter, actions } => {
                if let Some(pressed) = level {
                    counter.update(pressed, now);
                }
                counter.resolve(now).map(|gesture| {
                    debug!(channel = %self.name, ?gesture, "Press gesture");
                    actions.for_gesture(gesture).clone()
                })
            }
            Recognizer::Toggle { toggle, action } => {
                let fired = level.is_some_and(|touched| toggle.sample(touched, now));
                fired.then(|| {
                    debug!(channel = %self.name, "Touch toggle");
                    action.clone()
                })
            }
        };

        action.filter(|action| *action != Action::Ignore)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    use crate::error::{Error, Result};
    use crate::testing::ScriptedInput;

    struct BrokenLine;

    impl InputLine for BrokenLine {
        fn read(&mut self) -> Result<bool> {
            Err(Error::device("gpio9", "unexported"))
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_polarity() {
        assert!(Polarity::ActiveHigh.apply(true));
        assert!(!Polarity::ActiveHigh.apply(false));
        assert!(Polarity::ActiveLow.apply(false));
        assert!(!Polarity::ActiveLow.apply(true));
    }

    #[test]
    fn test_default_press_actions() {
        let actions = PressActions::default();
        assert_eq!(actions.for_gesture(PressGesture::Single), &Action::ToggleRecord);
        assert_eq!(actions.for_gesture(PressGesture::Double), &Action::EndSession);
        assert_eq!(actions.for_gesture(PressGesture::Many(4)), &Action::Ignore);
    }

    #[test]
    fn test_active_low_button_single_press() {
        let line = ScriptedInput::default();
        line.set(true);
        let mut channel = InputChannel::button("button", line.clone(), Polarity::ActiveLow, &Timing::DEFAULT);

        let start = Instant::now();
        assert_eq!(channel.poll(start), None);

        line.set(false);
        assert_eq!(channel.poll(start + ms(10)), None);
        line.set(true);
        assert_eq!(channel.poll(start + ms(100)), None);

        assert_eq!(channel.poll(start + ms(511)), Some(Action::ToggleRecord));
        assert_eq!(channel.poll(start + ms(1000)), None);
    }

    #[test]
    fn test_triple_press_is_dropped() {
        let line = ScriptedInput::default();
        let mut channel = InputChannel::button("button", line.clone(), Polarity::ActiveHigh, &Timing::DEFAULT);

        let start = Instant::now();
        for i in 0..3 {
            line.set(true);
            assert_eq!(channel.poll(start + ms(i * 100)), None);
            line.set(false);
            assert_eq!(channel.poll(start + ms(i * 100 + 50)), None);
        }
        assert_eq!(channel.poll(start + ms(900)), None);
        assert!(matches!(
            channel.recognizer(),
            Recognizer::Press { counter, .. } if counter.count() == 0
        ));
    }

    #[test]
    fn test_custom_bindings() {
        let line = ScriptedInput::default();
        let bindings = PressActions {
            many: Action::ToggleParam(ParamId::MAGNIFY_ENABLE),
            ..PressActions::default()
        };
        let mut channel = InputChannel::button("button", line.clone(), Polarity::ActiveHigh, &Timing::DEFAULT)
            .with_press_actions(bindings);

        let start = Instant::now();
        for i in 0..3 {
            line.set(true);
            channel.poll(start + ms(i * 100));
            line.set(false);
            channel.poll(start + ms(i * 100 + 50));
        }
        assert_eq!(
            channel.poll(start + ms(900)),
            Some(Action::ToggleParam(ParamId::MAGNIFY_ENABLE))
        );
    }

    #[test]
    fn test_touch_channel() {
        let line = ScriptedInput::default();
        let mut channel = InputChannel::touch(
            "touch",
            line.clone(),
            Polarity::ActiveHigh,
            ParamId::MAGNIFY_ENABLE,
            &Timing::DEFAULT,
        );

        let start = Instant::now();
        assert_eq!(channel.poll(start), None);
        line.set(true);
        assert_eq!(
            channel.poll(start + ms(10)),
            Some(Action::ToggleParam(ParamId::MAGNIFY_ENABLE))
        );
        assert_eq!(channel.poll(start + ms(20)), None);
        assert_eq!(channel.poll(start + ms(400)), None);

        let params: Vec<_> = channel.toggled_params().collect();
        assert_eq!(params, vec![&ParamId::MAGNIFY_ENABLE]);
    }

    #[test]
    fn test_read_failure_is_no_edge() {
        let mut channel = InputChannel::button("button", BrokenLine, Polarity::ActiveHigh, &Timing::DEFAULT);
        assert_eq!(channel.poll(Instant::now()), None);
    }
}
