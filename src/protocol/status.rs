//! Inbound RCP status messages.
//!
//! # Format
//!
//! ```json
//! { "id": "RECORD_STATE", "cur": { "val": 1 }, ... }
//! ```
//!
//! Only `id` and `cur.val` are read; everything else is ignored. Missing
//! fields decode to `None`, never to an error.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::Result;

use super::param::ParamId;

// ============================================================================
// StatusEvent
// ============================================================================

/// A decoded status update: parameter and current value.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    /// Parameter the update is about.
    pub id: Option<ParamId>,
    /// `cur.val`, if present and not `null`.
    pub value: Option<Value>,
}

impl StatusEvent {
    /// Returns `true` if this update is about `param`.
    #[inline]
    #[must_use]
    pub fn is(&self, param: &ParamId) -> bool {
        self.id.as_ref() == Some(param)
    }

    /// Current value as an integer.
    #[inline]
    #[must_use]
    pub fn value_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(Value::as_i64)
    }

    /// Current value as a flag: non-zero integers and `true` are on.
    #[must_use]
    pub fn value_flag(&self) -> Option<bool> {
        match self.value.as_ref()? {
            Value::Bool(on) => Some(*on),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            Value::String(s) => s.trim().parse::<i64>().ok().map(|v| v != 0),
            _ => None,
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes a status frame.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if `text` is not JSON. Valid
/// JSON of any shape decodes, with absent fields as `None`.
pub fn decode(text: &str) -> Result<StatusEvent> {
    let root: Value = serde_json::from_str(text)?;

    let id = root
        .get("id")
        .and_then(Value::as_str)
        .map(ParamId::from);

    let value = root
        .get("cur")
        .and_then(|cur| cur.get("val"))
        .filter(|val| !val.is_null())
        .cloned();

    Ok(StatusEvent { id, value })
}

// ============================================================================
// Tests
// ============================================================================
