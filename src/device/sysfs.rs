//! Linux sysfs devices.
//!
//! - [`SysfsInput`]: a GPIO `value` file (or anything holding `0`/`1`)
//! - [`SysfsRgbIndicator`]: three LED-class `brightness` files
//!
//! Both are plain file reads/writes; sysfs answers them without blocking.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

use super::{Color, Indicator, InputLine};

// ============================================================================
// Constants
// ============================================================================

/// Root of the legacy GPIO sysfs interface.
const GPIO_ROOT: &str = "/sys/class/gpio";

/// Root of the LED class.
const LED_ROOT: &str = "/sys/class/leds";

/// `max_brightness` assumed when the file is missing.
const DEFAULT_MAX_BRIGHTNESS: u32 = 255;

// ============================================================================
// SysfsInput
// ============================================================================

/// A digital input read from a sysfs value file.
#[derive(Debug, Clone)]
pub struct SysfsInput {
    path: PathBuf,
}

impl SysfsInput {
    /// Reads `path` directly.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses an exported GPIO: `/sys/class/gpio/gpio<N>/value`.
    #[inline]
    #[must_use]
    pub fn gpio(number: u32) -> Self {
        Self::new(Path::new(GPIO_ROOT).join(format!("gpio{number}")).join("value"))
    }

    /// Returns the file being sampled.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputLine for SysfsInput {
    fn read(&mut self) -> Result<bool> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| Error::device(self.path.display().to_string(), e.to_string()))?;

        match raw.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(Error::device(
                self.path.display().to_string(),
                format!("unexpected value '{other}'"),
            )),
        }
    }
}

// ============================================================================
// SysfsRgbIndicator
// ============================================================================

/// One LED-class channel.
#[derive(Debug, Clone)]
struct LedChannel {
    brightness: PathBuf,
    max: u32,
}

impl LedChannel {
    fn open(dir: &Path) -> Self {
        let max = fs::read_to_string(dir.join("max_brightness"))
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_BRIGHTNESS);

        Self {
            brightness: dir.join("brightness"),
            max,
        }
    }

    fn write(&self, level: u8) -> Result<()> {
        let value = u32::from(level) * self.max / 255;
        fs::write(&self.brightness, value.to_string())
            .map_err(|e| Error::device(self.brightness.display().to_string(), e.to_string()))
    }
}

/// An RGB light made of three LED-class devices.
#[derive(Debug, Clone)]
pub struct SysfsRgbIndicator {
    red: LedChannel,
    green: LedChannel,
    blue: LedChannel,
    brightness: f32,
}

impl SysfsRgbIndicator {
    /// Uses three LED directories (each holding `brightness`).
    #[must_use]
    pub fn new(red: impl AsRef<Path>, green: impl AsRef<Path>, blue: impl AsRef<Path>) -> Self {
        Self {
            red: LedChannel::open(red.as_ref()),
            green: LedChannel::open(green.as_ref()),
            blue: LedChannel::open(blue.as_ref()),
            brightness: 1.0,
        }
    }

    /// Uses `/sys/class/leds/<name>` for each channel.
    #[must_use]
    pub fn by_name(red: &str, green: &str, blue: &str) -> Self {
        let root = Path::new(LED_ROOT);
        Self::new(root.join(red), root.join(green), root.join(blue))
    }
}

impl Indicator for SysfsRgbIndicator {
    fn set_color(&mut self, color: Color) -> Result<()> {
        let scaled = color.scaled(self.brightness);
        debug!(%color, ?scaled, "Writing LED channels");

        self.red.write(scaled.r)?;
        self.green.write(scaled.g)?;
        self.blue.write(scaled.b)
    }

    fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        self.brightness = brightness.clamp(0.0, 1.0);
        Ok(())
    }

    fn off(&mut self) -> Result<()> {
        self.red.write(0)?;
        self.green.write(0)?;
        self.blue.write(0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn led_dir(root: &TempDir, name: &str, max: Option<u32>) -> PathBuf {
        let dir = root.path().join(name);
        fs::create_dir(&dir).expect("mkdir");
        fs::write(dir.join("brightness"), "0").expect("write");
        if let Some(max) = max {
            fs::write(dir.join("max_brightness"), format!("{max}\n")).expect("write");
        }
        dir
    }

    fn level(dir: &Path) -> String {
        fs::read_to_string(dir.join("brightness")).expect("read")
    }

    #[test]
    fn test_gpio_path() {
        let input = SysfsInput::gpio(17);
        assert_eq!(input.path(), Path::new("/sys/class/gpio/gpio17/value"));
    }

    #[test]
    fn test_input_reads_levels() {
        let root = TempDir::new().expect("tempdir");
        let path = root.path().join("value");
        let mut input = SysfsInput::new(&path);

        fs::write(&path, "1\n").expect("write");
        assert!(input.read().expect("read"));

        fs::write(&path, "0\n").expect("write");
        assert!(!input.read().expect("read"));
    }

    #[test]
    fn test_input_rejects_garbage() {
        let root = TempDir::new().expect("tempdir");
        let path = root.path().join("value");
        fs::write(&path, "high").expect("write");

        let err = SysfsInput::new(&path).read().unwrap_err();
        assert!(matches!(err, Error::Device { .. }));
    }

    #[test]
    fn test_input_missing_file_is_device_error() {
        let err = SysfsInput::new("/nonexistent/gpio/value").read().unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_indicator_writes_scaled_channels() {
        let root = TempDir::new().expect("tempdir");
        let red = led_dir(&root, "red", Some(255));
        let green = led_dir(&root, "green", Some(1));
        let blue = led_dir(&root, "blue", None);

        let mut indicator = SysfsRgbIndicator::new(&red, &green, &blue);
        indicator.set_brightness(0.5).expect("brightness");
        indicator.set_color(Color::YELLOW).expect("color");

        assert_eq!(level(&red), "128");
        assert_eq!(level(&green), "0");
        assert_eq!(level(&blue), "0");

        indicator.set_brightness(1.0).expect("brightness");
        indicator.set_color(Color::GREEN).expect("color");
        assert_eq!(level(&red), "0");
        assert_eq!(level(&green), "1");

        indicator.off().expect("off");
        assert_eq!(level(&green), "0");
    }
}
