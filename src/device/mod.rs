//! Hardware collaborators: indicator, input lines and network link.
//!
//! The session only ever talks to these traits. Handles are created by the
//! caller and moved into the control loop, which owns them for the lifetime
//! of the session.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `link` | Network bring-up for hosts whose OS manages Wi-Fi |
//! | `log` | Indicator that only logs |
//! | `sysfs` | Linux sysfs GPIO inputs and LED-class RGB indicator |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::config::Credentials;
use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// Network link implementations.
pub mod link;

/// Logging indicator.
pub mod log;

/// Linux sysfs devices.
pub mod sysfs;

// ============================================================================
// Re-exports
// ============================================================================

pub use link::PreassociatedLink;
pub use log::LogIndicator;
pub use sysfs::{SysfsInput, SysfsRgbIndicator};

// ============================================================================
// Color
// ============================================================================

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Camera idle.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Camera recording.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Camera paused.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// All channels dark.
    pub const OFF: Self = Self::rgb(0, 0, 0);

    /// Creates a color from channel values.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the triple with each channel scaled by `brightness`.
    #[must_use]
    pub fn scaled(self, brightness: f32) -> Self {
        let scale = |c: u8| (f32::from(c) * brightness.clamp(0.0, 1.0)).round() as u8;
        Self::rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::GREEN => f.write_str("green"),
            Self::RED => f.write_str("red"),
            Self::YELLOW => f.write_str("yellow"),
            Self::OFF => f.write_str("off"),
            Self { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A single RGB light with a global brightness.
pub trait Indicator {
    /// Shows `color` at the current global brightness.
    fn set_color(&mut self, color: Color) -> Result<()>;

    /// Sets global brightness in `[0, 1]`.
    fn set_brightness(&mut self, brightness: f32) -> Result<()>;

    /// Turns the light off.
    fn off(&mut self) -> Result<()>;
}

impl<T: Indicator + ?Sized> Indicator for Box<T> {
    fn set_color(&mut self, color: Color) -> Result<()> {
        (**self).set_color(color)
    }

    fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        (**self).set_brightness(brightness)
    }

    fn off(&mut self) -> Result<()> {
        (**self).off()
    }
}

/// A digital input line.
///
/// `read` returns the raw electrical level; polarity is applied by the
/// channel that owns the line.
pub trait InputLine {
    /// Samples the line. Must not block.
    fn read(&mut self) -> Result<bool>;
}

/// Network bring-up (Wi-Fi association or equivalent).
#[async_trait]
pub trait NetworkLink: Send {
    /// Joins the network and returns the local address.
    async fn connect(&mut self, credentials: &Credentials) -> Result<IpAddr>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::GREEN, Color::rgb(0, 255, 0));
        assert_eq!(Color::RED, Color::rgb(255, 0, 0));
        assert_eq!(Color::YELLOW, Color::rgb(255, 255, 0));
        assert_eq!(Color::GREEN.to_string(), "green");
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_scaled() {
        assert_eq!(Color::YELLOW.scaled(0.5), Color::rgb(128, 128, 0));
        assert_eq!(Color::RED.scaled(2.0), Color::RED);
        assert_eq!(Color::RED.scaled(0.0), Color::OFF);
    }
}
