//! Indicator that reports through `tracing` instead of a light.

use tracing::info;

use crate::error::Result;

use super::{Color, Indicator};

/// Logs every indicator change at `info`.
#[derive(Debug, Clone, Default)]
pub struct LogIndicator {
    brightness: f32,
    current: Option<Color>,
}

impl LogIndicator {
    /// Creates a dark indicator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last color shown, `None` if off.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<Color> {
        self.current
    }
}

impl Indicator for LogIndicator {
    fn set_color(&mut self, color: Color) -> Result<()> {
        info!(%color, brightness = self.brightness, "Indicator");
        self.current = Some(color);
        Ok(())
    }

    fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        self.brightness = brightness;
        Ok(())
    }

    fn off(&mut self) -> Result<()> {
        info!("Indicator off");
        self.current = None;
        Ok(())
    }
}
