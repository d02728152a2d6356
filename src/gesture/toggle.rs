//! Touch pad toggle: rising edge with a hold-off.
//!
//! A released → touched transition fires once. For the hold-off period
//! afterwards samples are ignored, so one physical touch cannot toggle
//! twice. The hold-off does not block: the caller keeps polling the
//! network meanwhile.

use std::time::Duration;

use tokio::time::Instant;

/// Rising-edge detector for one touch input.
#[derive(Debug, Clone)]
pub struct TouchToggle {
    /// Previous accepted sample.
    previous: bool,
    /// Samples before this instant are ignored.
    holdoff_until: Option<Instant>,
    /// Hold-off after each toggle.
    holdoff: Duration,
}

impl TouchToggle {
    /// Creates a released detector.
    #[inline]
    #[must_use]
    pub const fn new(holdoff: Duration) -> Self {
        Self {
            previous: false,
            holdoff_until: None,
            holdoff,
        }
    }

    /// Feeds one sample; returns `true` on a toggle.
    pub fn sample(&mut self, touched: bool, now: Instant) -> bool {
        if let Some(until) = self.holdoff_until {
            if now < until {
                return false;
            }
            self.holdoff_until = None;
        }

        let rising = touched && !self.previous;
        self.previous = touched;

        if rising {
            self.holdoff_until = Some(now + self.holdoff);
        }
        rising
    }

    /// Returns `true` inside the hold-off period.
    #[cfg(test)]
    fn in_holdoff(&self, now: Instant) -> bool {
        self.holdoff_until.is_some_and(|until| now < until)
    }
}
