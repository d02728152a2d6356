//! RCP protocol message types.
//!
//! RCP is the camera's JSON-over-WebSocket remote control protocol.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `rcp_config` | Local → Camera | Session setup, first message |
//! | `rcp_get` | Local → Camera | Ask for a parameter's current value |
//! | `rcp_set` | Local → Camera | Change a parameter |
//! | status | Camera → Local | Current value of a parameter (`id`, `cur.val`) |
//!
//! Status messages arrive both as replies to `rcp_get` and unsolicited,
//! whenever a parameter changes on the camera.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Outbound message builders |
//! | `param` | Parameter identifiers and prefix handling |
//! | `status` | Inbound status decoding |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound commands.
pub mod command;

/// Parameter identifiers.
pub mod param;

/// Inbound status messages.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{ClientInfo, Command, SetValue, build_config, build_get, build_set};
pub use param::{PARAM_PREFIX, ParamId, strip_prefix};
pub use status::{StatusEvent, decode};
