//! Session options and compiled-in defaults.
//!
//! Everything a session needs is held in [`SessionOptions`]. There is no
//! config file: values come from the compiled-in defaults, optionally
//! overlaid by environment variables via [`SessionOptions::from_env`].
//!
//! # Example
//!
//! ```ignore
//! use rcp_remote::config::{SessionOptions, Timing};
//!
//! let options = SessionOptions::for_camera("192.168.1.50")?
//!     .with_credentials("studio", "secret")
//!     .with_timing(Timing::default());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::Endpoint;

// ============================================================================
// Constants
// ============================================================================

/// Port the camera's RCP WebSocket server listens on.
pub const DEFAULT_PORT: u16 = 9998;

/// Request path of the RCP WebSocket server.
pub const DEFAULT_PATH: &str = "/rcp";

/// Client name announced in `rcp_config`.
pub const DEFAULT_CLIENT_NAME: &str = "RED Web App";

/// Indicator brightness applied at session start.
pub const DEFAULT_BRIGHTNESS: f32 = 0.5;

/// Camera address used when nothing else is configured.
pub const DEFAULT_CAMERA_IP: &str = "192.168.0.100";

/// Environment variable names read by [`SessionOptions::from_env`].
pub mod env_keys {
    /// Wi-Fi network name.
    pub const SSID: &str = "RCP_SSID";
    /// Wi-Fi passphrase.
    pub const PASSWORD: &str = "RCP_PASSWORD";
    /// Camera IP address; the endpoint is derived from it.
    pub const CAMERA_IP: &str = "RCP_CAMERA_IP";
    /// Full endpoint URL; wins over [`CAMERA_IP`].
    pub const ENDPOINT: &str = "RCP_ENDPOINT";
    /// Client name announced to the camera.
    pub const CLIENT_NAME: &str = "RCP_CLIENT_NAME";
    /// `1`/`true` to verify `Sec-WebSocket-Accept`.
    pub const VERIFY_ACCEPT: &str = "RCP_VERIFY_ACCEPT";
}

// ============================================================================
// AcceptPolicy
// ============================================================================

/// How strictly the handshake treats the server's `Sec-WebSocket-Accept`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AcceptPolicy {
    /// Read and discard the header.
    #[default]
    Ignore,
    /// Derive the expected value from the key and fail on mismatch.
    Verify,
}

// ============================================================================
// Timing
// ============================================================================

/// Timing constants for the control loop and gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Upper bound on one receive attempt.
    pub receive_poll: Duration,
    /// Sleep between loop iterations; also the de facto debounce floor.
    pub loop_interval: Duration,
    /// Quiet time after the last press before a press count resolves.
    pub double_press_window: Duration,
    /// Samples are ignored for this long after a touch toggle.
    pub touch_holdoff: Duration,
}

impl Timing {
    /// Default timing.
    pub const DEFAULT: Self = Self {
        receive_poll: Duration::from_millis(100),
        loop_interval: Duration::from_millis(10),
        double_press_window: Duration::from_millis(500),
        touch_holdoff: Duration::from_millis(300),
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Wi-Fi credentials handed to the network link.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Network name.
    pub ssid: String,
    /// Passphrase.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SessionOptions
// ============================================================================

/// Complete configuration of one remote session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Wi-Fi credentials.
    pub credentials: Credentials,

    /// Camera RCP endpoint.
    pub endpoint: Endpoint,

    /// Name announced in `rcp_config`.
    pub client_name: String,

    /// Global indicator brightness in `[0, 1]`.
    pub brightness: f32,

    /// Loop and gesture timing.
    pub timing: Timing,

    /// Handshake strictness.
    pub accept_policy: AcceptPolicy,
}

// ============================================================================
// Constructors
// ============================================================================

impl SessionOptions {
    /// Creates options for a camera at `ip`, all else defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] or [`Error::Url`] if `ip` does not form a
    /// valid endpoint.
    pub fn for_camera(ip: &str) -> Result<Self> {
        Ok(Self {
            credentials: Credentials::default(),
            endpoint: endpoint_for_ip(ip)?,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            brightness: DEFAULT_BRIGHTNESS,
            timing: Timing::DEFAULT,
            accept_policy: AcceptPolicy::Ignore,
        })
    }

    /// Loads options from the environment on top of compiled-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable holds an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ip = lookup(env_keys::CAMERA_IP).unwrap_or_else(|| DEFAULT_CAMERA_IP.to_string());
        let mut options = Self::for_camera(&ip)?;

        if let Some(endpoint) = lookup(env_keys::ENDPOINT) {
            options.endpoint = Endpoint::parse(&endpoint)?;
        }
        if let Some(ssid) = lookup(env_keys::SSID) {
            options.credentials.ssid = ssid;
        }
        if let Some(password) = lookup(env_keys::PASSWORD) {
            options.credentials.password = password;
        }
        if let Some(name) = lookup(env_keys::CLIENT_NAME) {
            options.client_name = name;
        }
        if let Some(flag) = lookup(env_keys::VERIFY_ACCEPT) {
            options.accept_policy = if parse_flag(&flag)? {
                AcceptPolicy::Verify
            } else {
                AcceptPolicy::Ignore
            };
        }

        debug!(endpoint = %options.endpoint, ssid = %options.credentials.ssid, "Loaded session options");
        Ok(options)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SessionOptions {
    /// Sets Wi-Fi credentials.
    #[inline]
    #[must_use]
    pub fn with_credentials(mut self, ssid: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials {
            ssid: ssid.into(),
            password: password.into(),
        };
        self
    }

    /// Sets the timing constants.
    #[inline]
    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Sets the handshake accept policy.
    #[inline]
    #[must_use]
    pub fn with_accept_policy(mut self, policy: AcceptPolicy) -> Self {
        self.accept_policy = policy;
        self
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Builds `ws://<ip>:9998/rcp`.
pub fn endpoint_for_ip(ip: &str) -> Result<Endpoint> {
    let ip = ip.trim();
    if ip.is_empty() {
        return Err(Error::config("camera IP address is empty"));
    }
    let host = if ip.contains(':') && !ip.starts_with('[') {
        format!("[{ip}]")
    } else {
        ip.to_string()
    };
    Endpoint::parse(&format!("ws://{host}:{DEFAULT_PORT}{DEFAULT_PATH}"))
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::config(format!("expected a boolean flag, got '{other}'"))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use rustc_hash::FxHashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_timing_defaults() {
        let timing = Timing::default();
        assert_eq!(timing.receive_poll, Duration::from_millis(100));
        assert_eq!(timing.loop_interval, Duration::from_millis(10));
        assert_eq!(timing.double_press_window, Duration::from_millis(500));
        assert_eq!(timing.touch_holdoff, Duration::from_millis(300));
    }

    #[test]
    fn test_for_camera_derives_endpoint() {
        let options = SessionOptions::for_camera("10.1.1.7").expect("options");
        assert_eq!(options.endpoint.to_string(), "ws://10.1.1.7:9998/rcp");
        assert_eq!(options.client_name, DEFAULT_CLIENT_NAME);
        assert_eq!(options.accept_policy, AcceptPolicy::Ignore);
    }

    #[test]
    fn test_for_camera_rejects_empty_ip() {
        assert!(SessionOptions::for_camera("  ").is_err());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let options = SessionOptions::from_lookup(lookup_from(&[])).expect("options");
        assert_eq!(options.endpoint.host, DEFAULT_CAMERA_IP);
        assert!(options.credentials.ssid.is_empty());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let options = SessionOptions::from_lookup(lookup_from(&[
            (env_keys::SSID, "set-net"),
            (env_keys::PASSWORD, "hunter2"),
            (env_keys::CAMERA_IP, "10.0.0.9"),
            (env_keys::CLIENT_NAME, "Tally"),
            (env_keys::VERIFY_ACCEPT, "true"),
        ]))
        .expect("options");

        assert_eq!(options.credentials.ssid, "set-net");
        assert_eq!(options.credentials.password, "hunter2");
        assert_eq!(options.endpoint.host, "10.0.0.9");
        assert_eq!(options.client_name, "Tally");
        assert_eq!(options.accept_policy, AcceptPolicy::Verify);
    }

    #[test]
    fn test_endpoint_env_wins_over_ip() {
        let options = SessionOptions::from_lookup(lookup_from(&[
            (env_keys::CAMERA_IP, "10.0.0.9"),
            (env_keys::ENDPOINT, "wss://cam.example:8443/rcp"),
        ]))
        .expect("options");

        assert_eq!(options.endpoint.host, "cam.example");
        assert!(options.endpoint.scheme.is_secure());
    }

    #[test]
    fn test_bad_flag_is_config_error() {
        let err =
            SessionOptions::from_lookup(lookup_from(&[(env_keys::VERIFY_ACCEPT, "maybe")]))
                .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            ssid: "net".into(),
            password: "secret".into(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("net"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_ipv6_camera_ip() {
        let endpoint = endpoint_for_ip("fe80::2").expect("endpoint");
        assert_eq!(endpoint.host, "fe80::2");
        assert_eq!(endpoint.port, DEFAULT_PORT);
    }
}
