//! RCP parameter identifiers.
//!
//! Parameters are named like `RCP_PARAM_RECORD_STATE` in the camera's SDK,
//! but travel on the wire without the `RCP_PARAM_` namespace prefix.

// ============================================================================
// Imports
// ============================================================================

use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Namespace prefix stripped before transmission.
pub const PARAM_PREFIX: &str = "RCP_PARAM_";

// ============================================================================
// strip_prefix
// ============================================================================

/// Removes the `RCP_PARAM_` namespace prefix, if present.
///
/// Repeated prefixes are removed too, so applying this twice is the same
/// as applying it once.
#[inline]
#[must_use]
pub fn strip_prefix(id: &str) -> &str {
    id.trim_start_matches(PARAM_PREFIX)
}

// ============================================================================
// ParamId
// ============================================================================

/// A wire-form parameter identifier (prefix already stripped).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamId(Cow<'static, str>);

impl ParamId {
    /// Camera record state: 0 idle, 1 recording, 2 paused.
    pub const RECORD_STATE: Self = Self(Cow::Borrowed("RECORD_STATE"));

    /// Magnify (focus assist) on/off.
    pub const MAGNIFY_ENABLE: Self = Self(Cow::Borrowed("MAGNIFY_ENABLE"));

    /// Creates an identifier, stripping the namespace prefix.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut id = id.into();
        let prefix_len = id.len() - strip_prefix(&id).len();
        id.drain(..prefix_len);
        Self(Cow::Owned(id))
    }

    /// Returns the wire form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParamId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ParamId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for ParamId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("RCP_PARAM_RECORD_STATE"), "RECORD_STATE");
        assert_eq!(strip_prefix("RECORD_STATE"), "RECORD_STATE");
        assert_eq!(strip_prefix("RCP_PARAM_"), "");
        assert_eq!(strip_prefix("rcp_param_ISO"), "rcp_param_ISO");
        assert_eq!(strip_prefix("RCP_PARAM_RCP_PARAM_ISO"), "ISO");
    }

    #[test]
    fn test_param_id_normalizes() {
        assert_eq!(ParamId::new("RCP_PARAM_RECORD_STATE"), ParamId::RECORD_STATE);
        assert_eq!(ParamId::from("MAGNIFY_ENABLE"), ParamId::MAGNIFY_ENABLE);
        assert_eq!(ParamId::RECORD_STATE.to_string(), "RECORD_STATE");
    }

    #[test]
    fn test_param_id_serde_is_plain_string() {
        let json = serde_json::to_string(&ParamId::RECORD_STATE).expect("serialize");
        assert_eq!(json, r#""RECORD_STATE""#);

        let id: ParamId = serde_json::from_str(r#""ISO""#).expect("deserialize");
        assert_eq!(id.as_str(), "ISO");
    }

    proptest! {
        #[test]
        fn prop_strip_prefix_idempotent(id in "(RCP_PARAM_){0,3}[A-Z_]{0,16}") {
            let once = strip_prefix(&id);
            prop_assert_eq!(strip_prefix(once), once);
            prop_assert!(!once.starts_with(PARAM_PREFIX));
        }
    }
}
