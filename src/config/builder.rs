//! Builder pattern for session configuration.
//!
//! Provides a fluent API for assembling validated [`SessionOptions`].
//!
//! # Example
//!
//! ```no_run
//! use rcp_remote::config::SessionBuilder;
//!
//! # fn example() -> rcp_remote::Result<()> {
//! let options = SessionBuilder::new()
//!     .camera_ip("192.168.1.50")
//!     .credentials("studio", "secret")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::transport::Endpoint;

use super::options::{
    AcceptPolicy, Credentials, DEFAULT_BRIGHTNESS, DEFAULT_CLIENT_NAME, SessionOptions, Timing,
    endpoint_for_ip,
};

// ============================================================================
// EndpointSource
// ============================================================================

/// Where the endpoint comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EndpointSource {
    /// Bare camera address; endpoint derived as `ws://<ip>:9998/rcp`.
    CameraIp(String),
    /// Full URL.
    Url(String),
}

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for configuring [`SessionOptions`].
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    /// Endpoint source.
    endpoint: Option<EndpointSource>,
    /// Wi-Fi credentials.
    credentials: Option<Credentials>,
    /// Client name override.
    client_name: Option<String>,
    /// Brightness override.
    brightness: Option<f32>,
    /// Timing override.
    timing: Option<Timing>,
    /// Accept policy override.
    accept_policy: Option<AcceptPolicy>,
}

// ============================================================================
// SessionBuilder Implementation
// ============================================================================

impl SessionBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the camera IP address.
    #[inline]
    #[must_use]
    pub fn camera_ip(mut self, ip: impl Into<String>) -> Self {
        self.endpoint = Some(EndpointSource::CameraIp(ip.into()));
        self
    }

    /// Sets the full endpoint URL (`ws://` or `wss://`).
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(EndpointSource::Url(url.into()));
        self
    }

    /// Sets Wi-Fi credentials.
    #[inline]
    #[must_use]
    pub fn credentials(mut self, ssid: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            ssid: ssid.into(),
            password: password.into(),
        });
        self
    }

    /// Sets the client name announced in `rcp_config`.
    #[inline]
    #[must_use]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sets the global indicator brightness.
    #[inline]
    #[must_use]
    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Sets loop and gesture timing.
    #[inline]
    #[must_use]
    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Sets the handshake accept policy.
    #[inline]
    #[must_use]
    pub fn accept_policy(mut self, policy: AcceptPolicy) -> Self {
        self.accept_policy = Some(policy);
        self
    }

    /// Builds the options with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no endpoint was set
    /// - [`Error::Config`] if brightness is outside `[0, 1]`
    /// - [`Error::Config`] if the timing windows are zero
    /// - [`Error::Url`] if the endpoint URL does not parse
    pub fn build(self) -> Result<SessionOptions> {
        let endpoint = self.validate_endpoint()?;
        let brightness = self.validate_brightness()?;
        let timing = self.validate_timing()?;

        Ok(SessionOptions {
            credentials: self.credentials.unwrap_or_default(),
            endpoint,
            client_name: self
                .client_name
                .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
            brightness,
            timing,
            accept_policy: self.accept_policy.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionBuilder {
    /// Validates the endpoint configuration.
    fn validate_endpoint(&self) -> Result<Endpoint> {
        match &self.endpoint {
            Some(EndpointSource::CameraIp(ip)) => endpoint_for_ip(ip),
            Some(EndpointSource::Url(url)) => Endpoint::parse(url),
            None => Err(Error::config(
                "Camera endpoint is required. Use .camera_ip() or .endpoint() to set it.\n\
                 Example: SessionBuilder::new().camera_ip(\"192.168.1.50\")",
            )),
        }
    }

    /// Validates the brightness configuration.
    fn validate_brightness(&self) -> Result<f32> {
        let brightness = self.brightness.unwrap_or(DEFAULT_BRIGHTNESS);
        if !(0.0..=1.0).contains(&brightness) {
            return Err(Error::config(format!(
                "brightness must be within 0.0..=1.0, got {brightness}"
            )));
        }
        Ok(brightness)
    }

    /// Validates the timing configuration.
    fn validate_timing(&self) -> Result<Timing> {
        let timing = self.timing.unwrap_or_default();
        if timing.receive_poll.is_zero() || timing.double_press_window.is_zero() {
            return Err(Error::config(
                "receive poll and double-press window must be non-zero",
            ));
        }
        Ok(timing)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::transport::Scheme;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = SessionBuilder::new();
        assert!(builder.endpoint.is_none());
        assert!(builder.credentials.is_none());
    }

    #[test]
    fn test_build_fails_without_endpoint() {
        let err = SessionBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn test_camera_ip_builds_default_endpoint() {
        let options = SessionBuilder::new()
            .camera_ip("192.168.1.50")
            .build()
            .expect("build");
        assert_eq!(options.endpoint.to_string(), "ws://192.168.1.50:9998/rcp");
        assert_eq!(options.brightness, DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn test_endpoint_url() {
        let options = SessionBuilder::new()
            .endpoint("wss://camera:443/rcp")
            .build()
            .expect("build");
        assert_eq!(options.endpoint.scheme, Scheme::Wss);
    }

    #[test]
    fn test_credentials_and_client_name() {
        let options = SessionBuilder::new()
            .camera_ip("10.0.0.1")
            .credentials("net", "pw")
            .client_name("Remote")
            .accept_policy(AcceptPolicy::Verify)
            .build()
            .expect("build");
        assert_eq!(options.credentials.ssid, "net");
        assert_eq!(options.client_name, "Remote");
        assert_eq!(options.accept_policy, AcceptPolicy::Verify);
    }

    #[test]
    fn test_brightness_out_of_range() {
        let result = SessionBuilder::new()
            .camera_ip("10.0.0.1")
            .brightness(1.5)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_double_press_window_rejected() {
        let timing = Timing {
            double_press_window: Duration::ZERO,
            ..Timing::default()
        };
        let result = SessionBuilder::new()
            .camera_ip("10.0.0.1")
            .timing(timing)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_is_clone() {
        let builder = SessionBuilder::new().camera_ip("10.0.0.1");
        let cloned = builder.clone();
        assert_eq!(builder.endpoint, cloned.endpoint);
    }
}
