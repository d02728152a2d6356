//! Outbound RCP commands.
//!
//! All commands serialize as compact JSON with a `type` discriminator:
//!
//! | Type | Fields |
//! |------|--------|
//! | `rcp_config` | `strings_decoded`, `json_minified`, `include_cacheable_flags`, `encoding_type`, `client.name` |
//! | `rcp_get` | `id` |
//! | `rcp_set` | `id`, `value` |
//!
//! Identifiers are always sent without the `RCP_PARAM_` prefix.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::error::Result;

use super::param::ParamId;

// ============================================================================
// SetValue
// ============================================================================

/// Value carried by `rcp_set`: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SetValue {
    /// Integer value.
    Int(i64),
    /// String value.
    Str(String),
}

impl SetValue {
    /// Literal `"2"`: flips record state instead of setting it.
    #[inline]
    #[must_use]
    pub fn toggle() -> Self {
        Self::Str("2".to_string())
    }

    /// `1` or `0`.
    #[inline]
    #[must_use]
    pub fn flag(on: bool) -> Self {
        Self::Int(i64::from(on))
    }
}

impl From<i64> for SetValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SetValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for SetValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

// ============================================================================
// ClientInfo
// ============================================================================

/// Client identification inside `rcp_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    /// Display name shown by the camera.
    pub name: String,
}

// ============================================================================
// Command
// ============================================================================

/// An outbound RCP message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Session setup; must be the first message.
    #[serde(rename = "rcp_config")]
    Config {
        /// 1 to receive decoded strings.
        strings_decoded: u8,
        /// 1 to receive minified JSON.
        json_minified: u8,
        /// 1 to receive cacheable flags.
        include_cacheable_flags: u8,
        /// String encoding of values.
        encoding_type: String,
        /// Client identification.
        client: ClientInfo,
    },

    /// Request the current value of a parameter.
    #[serde(rename = "rcp_get")]
    Get {
        /// Parameter to read.
        id: ParamId,
    },

    /// Set a parameter.
    #[serde(rename = "rcp_set")]
    Set {
        /// Parameter to write.
        id: ParamId,
        /// New value.
        value: SetValue,
    },
}

impl Command {
    /// Creates the fixed `rcp_config` message.
    #[must_use]
    pub fn config(client_name: impl Into<String>) -> Self {
        Self::Config {
            strings_decoded: 0,
            json_minified: 1,
            include_cacheable_flags: 0,
            encoding_type: "html".to_string(),
            client: ClientInfo {
                name: client_name.into(),
            },
        }
    }

    /// Creates an `rcp_get`.
    #[inline]
    #[must_use]
    pub fn get(id: impl Into<ParamId>) -> Self {
        Self::Get { id: id.into() }
    }

    /// Creates an `rcp_set`.
    #[inline]
    #[must_use]
    pub fn set(id: impl Into<ParamId>, value: impl Into<SetValue>) -> Self {
        Self::Set {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Short name for logs.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "rcp_config",
            Self::Get { .. } => "rcp_get",
            Self::Set { .. } => "rcp_set",
        }
    }

    /// Serializes to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Serialized `rcp_config`.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn build_config(client_name: &str) -> Result<String> {
    Command::config(client_name).to_json()
}

/// Serialized `rcp_get` for `param_id` (prefix stripped).
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn build_get(param_id: &str) -> Result<String> {
    Command::get(param_id).to_json()
}

/// Serialized `rcp_set` for `param_id` (prefix stripped).
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn build_set(param_id: &str, value: impl Into<SetValue>) -> Result<String> {
    Command::set(param_id, value).to_json()
}

// ============================================================================
// Tests
// ============================================================================
