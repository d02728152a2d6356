//! Session configuration.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SessionOptions`] | Complete, validated configuration |
//! | [`SessionBuilder`] | Fluent configuration builder |
//! | [`Timing`] | Loop and gesture timing constants |
//! | [`AcceptPolicy`] | Handshake strictness |
//!
//! # Example
//!
//! ```no_run
//! use rcp_remote::config::{AcceptPolicy, SessionBuilder};
//!
//! # fn example() -> rcp_remote::Result<()> {
//! let options = SessionBuilder::new()
//!     .camera_ip("192.168.1.50")
//!     .accept_policy(AcceptPolicy::Verify)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for session configuration.
pub mod builder;

/// Session options, timing and defaults.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use options::{
    AcceptPolicy, Credentials, DEFAULT_BRIGHTNESS, DEFAULT_CLIENT_NAME, DEFAULT_PATH,
    DEFAULT_PORT, SessionOptions, Timing,
};
