//! Record state to indicator color.
//!
//! | Value | State | Color |
//! |-------|-------|-------|
//! | 0 | Idle | green |
//! | 1 | Recording | red |
//! | 2 | Paused | yellow |
//!
//! Any other value leaves the indicator as it is.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, info};

use crate::device::{Color, Indicator};
use crate::error::Result;

// ============================================================================
// RecordState
// ============================================================================

/// Camera record state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Not recording.
    Idle,
    /// Recording.
    Recording,
    /// Recording paused.
    Paused,
}

impl RecordState {
    /// Parses the wire value.
    #[inline]
    #[must_use]
    pub const fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Recording),
            2 => Some(Self::Paused),
            _ => None,
        }
    }

    /// Indicator color for this state.
    #[inline]
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Idle => Color::GREEN,
            Self::Recording => Color::RED,
            Self::Paused => Color::YELLOW,
        }
    }
}

// ============================================================================
// Mapping
// ============================================================================

/// Maps a decoded `cur.val` to a color; `None` means "no change".
#[must_use]
pub fn map_state(value: Option<&Value>) -> Option<Color> {
    value
        .and_then(Value::as_i64)
        .and_then(RecordState::from_value)
        .map(RecordState::color)
}

/// Applies `value` to `indicator`.
///
/// Returns the state shown, or `None` if the value was unmapped and the
/// indicator was left untouched.
///
/// # Errors
///
/// Returns the indicator's error if writing the color fails.
pub fn apply_state<I>(indicator: &mut I, value: Option<&Value>) -> Result<Option<RecordState>>
where
    I: Indicator + ?Sized,
{
    let Some(state) = value.and_then(Value::as_i64).and_then(RecordState::from_value) else {
        debug!(?value, "Unmapped record state, indicator unchanged");
        return Ok(None);
    };

    indicator.set_color(state.color())?;
    info!(?state, color = %state.color(), "Indicator updated");
    Ok(Some(state))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::testing::{IndicatorCall, RecordingIndicator};

    #[test]
    fn test_map_state() {
        assert_eq!(map_state(Some(&json!(0))), Some(Color::GREEN));
        assert_eq!(map_state(Some(&json!(1))), Some(Color::RED));
        assert_eq!(map_state(Some(&json!(2))), Some(Color::YELLOW));
        assert_eq!(map_state(Some(&json!(99))), None);
        assert_eq!(map_state(Some(&json!("1"))), None);
        assert_eq!(map_state(None), None);
    }

    #[test]
    fn test_apply_state_sets_color() {
        let mut indicator = RecordingIndicator::default();
        let state = apply_state(&mut indicator, Some(&json!(1))).expect("apply");
        assert_eq!(state, Some(RecordState::Recording));
        assert_eq!(indicator.calls(), vec![IndicatorCall::Color(Color::RED)]);
    }

    #[test]
    fn test_apply_unmapped_leaves_indicator() {
        let mut indicator = RecordingIndicator::default();
        assert_eq!(apply_state(&mut indicator, Some(&json!(7))).expect("apply"), None);
        assert_eq!(apply_state(&mut indicator, None).expect("apply"), None);
        assert!(indicator.calls().is_empty());
    }
}
