//! Double-press chord detection.
//!
//! The picker's global toggle is a double press of one key inside a short
//! window. The tracker is deliberately strict about re-arming:
//!
//! - a press of any *other* key disarms the chord entirely, so `q`-then-`x`-
//!   then-`q` never fires no matter how fast it is typed;
//! - a fired chord resets to the disarmed state, so a third rapid press
//!   starts a fresh window instead of firing again;
//! - an expired first press becomes the new first press of the next window.

use std::time::{Duration, Instant};

/// Detects two presses of a designated key within a threshold window.
#[derive(Debug)]
pub struct DoublePressTracker<K> {
    chord_key: K,
    threshold: Duration,
    armed_at: Option<Instant>,
}

impl<K: PartialEq + Copy> DoublePressTracker<K> {
    /// Track double presses of `chord_key` within `threshold`.
    #[must_use]
    pub fn new(chord_key: K, threshold: Duration) -> Self {
        Self {
            chord_key,
            threshold,
            armed_at: None,
        }
    }

    /// Feed one key press. Returns `true` when this press completes the
    /// chord.
    pub fn observe(&mut self, key: K, now: Instant) -> bool {
        if key != self.chord_key {
            self.armed_at = None;
            return false;
        }
        match self.armed_at.take() {
            Some(first) if now.duration_since(first) <= self.threshold => true,
            _ => {
                self.armed_at = Some(now);
                false
            }
        }
    }

    /// Disarm without observing a key (focus loss, popup open).
    pub fn reset(&mut self) {
        self.armed_at = None;
    }
}
