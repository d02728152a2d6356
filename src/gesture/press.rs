//! Button press counting.
//!
//! ```text
//!            press edge: count += 1, last_press = now
//!   Released ─────────────────────────────────────────► Pressed
//!      ▲                                                   │
//!      └────────────────── release edge ───────────────────┘
//! ```
//!
//! Independently of the level, once `count > 0` and more than the
//! double-press window has passed since the last press edge, the count
//! resolves into a [`PressGesture`] and resets to zero.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

// ============================================================================
// PressGesture
// ============================================================================

/// A resolved press pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressGesture {
    /// One press, then quiet.
    Single,
    /// Two presses within the window, then quiet.
    Double,
    /// Three or more presses within the window.
    Many(u32),
}

// ============================================================================
// PressCounter
// ============================================================================

/// Press-count state machine for one button.
#[derive(Debug, Clone)]
pub struct PressCounter {
    /// Presses since the last resolution.
    count: u32,
    /// Time of the most recent press edge.
    last_press: Option<Instant>,
    /// Debounced level: `true` while held.
    pressed: bool,
    /// Quiet time before the count resolves.
    window: Duration,
}

impl PressCounter {
    /// Creates a released counter with `window` as the double-press window.
    #[inline]
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            count: 0,
            last_press: None,
            pressed: false,
            window,
        }
    }

    /// Presses counted since the last resolution.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns `true` while the button is held.
    #[inline]
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feeds one sample (already polarity-corrected).
    ///
    /// Counts only on the released → pressed edge.
    pub fn update(&mut self, pressed: bool, now: Instant) {
        match (self.pressed, pressed) {
            (false, true) => {
                self.pressed = true;
                self.count += 1;
                self.last_press = Some(now);
                trace!(count = self.count, "Press edge");
            }
            (true, false) => self.pressed = false,
            _ => {}
        }
    }

    /// Resolves the count once the window has passed since the last press.
    pub fn resolve(&mut self, now: Instant) -> Option<PressGesture> {
        let last = self.last_press?;
        if self.count == 0 || now.saturating_duration_since(last) <= self.window {
            return None;
        }

        let gesture = match self.count {
            1 => PressGesture::Single,
            2 => PressGesture::Double,
            n => PressGesture::Many(n),
        };
        self.count = 0;
        Some(gesture)
    }

    /// [`update`](Self::update) then [`resolve`](Self::resolve).
    #[cfg(test)]
    fn sample(&mut self, pressed: bool, now: Instant) -> Option<PressGesture> {
        self.update(pressed, now);
        self.resolve(now)
    }

    /// Back to released with no count.
    #[cfg(test)]
    fn reset(&mut self) {
        self.count = 0;
        self.last_press = None;
        self.pressed = false;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);
    const TICK: Duration = Duration::from_millis(10);

    /// Feeds `levels` one tick apart, then idles for `quiet`; collects gestures.
    fn run(counter: &mut PressCounter, start: Instant, levels: &[bool], quiet: Duration) -> Vec<PressGesture> {
        let mut now = start;
        let mut out = Vec::new();
        for &level in levels {
            out.extend(counter.sample(level, now));
            now += TICK;
        }
        let end = now + quiet;
        while now <= end {
            out.extend(counter.sample(false, now));
            now += TICK;
        }
        out
    }

    #[test]
    fn test_single_press_resolves_once() {
        let mut counter = PressCounter::new(WINDOW);
        let gestures = run(&mut counter, Instant::now(), &[true, true, false], Duration::from_millis(600));
        assert_eq!(gestures, vec![PressGesture::Single]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_double_press_resolves_once() {
        let mut counter = PressCounter::new(WINDOW);
        let gestures = run(
            &mut counter,
            Instant::now(),
            &[true, false, false, true, false],
            Duration::from_millis(600),
        );
        assert_eq!(gestures, vec![PressGesture::Double]);
    }

    #[test]
    fn test_triple_press_is_many() {
        let mut counter = PressCounter::new(WINDOW);
        let gestures = run(
            &mut counter,
            Instant::now(),
            &[true, false, true, false, true, false],
            Duration::from_millis(600),
        );
        assert_eq!(gestures, vec![PressGesture::Many(3)]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_no_resolution_inside_window() {
        let start = Instant::now();
        let mut counter = PressCounter::new(WINDOW);
        assert_eq!(counter.sample(true, start), None);
        assert_eq!(counter.sample(false, start + Duration::from_millis(100)), None);
        assert_eq!(counter.resolve(start + WINDOW), None);
        assert_eq!(counter.count(), 1);
        assert_eq!(
            counter.resolve(start + WINDOW + Duration::from_millis(1)),
            Some(PressGesture::Single)
        );
    }

    #[test]
    fn test_hold_resolves_while_pressed() {
        let start = Instant::now();
        let mut counter = PressCounter::new(WINDOW);
        counter.sample(true, start);
        let gesture = counter.sample(true, start + Duration::from_millis(600));
        assert_eq!(gesture, Some(PressGesture::Single));
        assert!(counter.is_pressed());

        // Still held: no new edge, nothing more to resolve.
        assert_eq!(counter.sample(true, start + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_second_press_restarts_window() {
        let start = Instant::now();
        let mut counter = PressCounter::new(WINDOW);
        counter.sample(true, start);
        counter.sample(false, start + Duration::from_millis(50));
        counter.sample(true, start + Duration::from_millis(450));
        counter.sample(false, start + Duration::from_millis(500));

        assert_eq!(counter.resolve(start + Duration::from_millis(700)), None);
        assert_eq!(
            counter.resolve(start + Duration::from_millis(951)),
            Some(PressGesture::Double)
        );
    }

    #[test]
    fn test_reset() {
        let mut counter = PressCounter::new(WINDOW);
        counter.sample(true, Instant::now());
        counter.reset();
        assert_eq!(counter.count(), 0);
        assert!(!counter.is_pressed());
    }
}
