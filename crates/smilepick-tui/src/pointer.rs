//! Click versus long-press disambiguation for pointer input.
//!
//! A press is pending until either the hold delay elapses (long press) or
//! the pointer is released first (click). The two outcomes are mutually
//! exclusive: once the long press fires, the eventual release is reported
//! as [`PressOutcome::Suppressed`] so the caller never also runs the click
//! action for the same press.
//!
//! The long press can surface through either path. [`fire_due`] lets a
//! tick loop deliver it at the exact hold expiry while the pointer is still
//! down; if no tick arrived in time, [`release`] reports it instead.
//!
//! [`fire_due`]: LongPressTracker::fire_due
//! [`release`]: LongPressTracker::release

use std::time::{Duration, Instant};

/// What a pointer release amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome<T> {
    /// Released before the hold delay: an ordinary click on `T`.
    Click(T),
    /// Held past the delay without an intervening tick: a long press on `T`.
    LongPress(T),
    /// The long press already fired through [`LongPressTracker::fire_due`];
    /// this release must not trigger anything.
    Suppressed,
    /// No press was being tracked.
    Idle,
}

/// Tracks one pointer press at a time against a hold threshold.
#[derive(Debug)]
pub struct LongPressTracker<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    fired: bool,
}

impl<T: Clone> LongPressTracker<T> {
    /// Track presses against the given hold delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            fired: false,
        }
    }

    /// Begin tracking a press on `target`. Replaces any previous press.
    pub fn press(&mut self, target: T, now: Instant) {
        self.pending = Some((target, now));
        self.fired = false;
    }

    /// Deliver the long press if the hold delay has elapsed.
    ///
    /// Returns the target at most once per press; subsequent calls (and the
    /// eventual release) are suppressed.
    pub fn fire_due(&mut self, now: Instant) -> Option<T> {
        if self.fired {
            return None;
        }
        let (target, started) = self.pending.as_ref()?;
        if now.duration_since(*started) >= self.delay {
            self.fired = true;
            Some(target.clone())
        } else {
            None
        }
    }

    /// End the press and classify it.
    pub fn release(&mut self, now: Instant) -> PressOutcome<T> {
        let fired = std::mem::take(&mut self.fired);
        match self.pending.take() {
            Some(_) if fired => PressOutcome::Suppressed,
            Some((target, started)) => {
                if now.duration_since(started) >= self.delay {
                    PressOutcome::LongPress(target)
                } else {
                    PressOutcome::Click(target)
                }
            }
            None => PressOutcome::Idle,
        }
    }

    /// Abandon the press without an outcome (pointer left the element, or
    /// the gesture was cancelled).
    pub fn cancel(&mut self) {
        self.pending = None;
        self.fired = false;
    }

    /// Whether a press is currently held.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn quick_release_is_a_click() {
        let base = Instant::now();
        let mut presses = LongPressTracker::new(DELAY);
        presses.press("rofl", at(base, 0));
        assert_eq!(presses.fire_due(at(base, 100)), None);
        assert_eq!(presses.release(at(base, 200)), PressOutcome::Click("rofl"));
    }

    #[test]
    fn fired_long_press_suppresses_the_release() {
        let base = Instant::now();
        let mut presses = LongPressTracker::new(DELAY);
        presses.press("rofl", at(base, 0));
        assert_eq!(presses.fire_due(at(base, 500)), Some("rofl"));
        // Only once.
        assert_eq!(presses.fire_due(at(base, 600)), None);
        assert_eq!(presses.release(at(base, 700)), PressOutcome::Suppressed);
    }

    #[test]
    fn late_release_without_tick_is_a_long_press() {
        let base = Instant::now();
        let mut presses = LongPressTracker::new(DELAY);
        presses.press("cat", at(base, 0));
        assert_eq!(
            presses.release(at(base, 800)),
            PressOutcome::LongPress("cat")
        );
    }

    #[test]
    fn cancel_discards_the_press() {
        let base = Instant::now();
        let mut presses = LongPressTracker::new(DELAY);
        presses.press("cat", at(base, 0));
        presses.cancel();
        assert_eq!(presses.fire_due(at(base, 900)), None);
        assert_eq!(presses.release(at(base, 900)), PressOutcome::Idle);
    }

    #[test]
    fn new_press_replaces_old_state() {
        let base = Instant::now();
        let mut presses = LongPressTracker::new(DELAY);
        presses.press("a", at(base, 0));
        assert_eq!(presses.fire_due(at(base, 500)), Some("a"));
        // A fresh press clears the fired flag.
        presses.press("b", at(base, 600));
        assert_eq!(presses.release(at(base, 700)), PressOutcome::Click("b"));
    }

    #[test]
    fn release_without_press_is_idle() {
        let base = Instant::now();
        let mut presses: LongPressTracker<&str> = LongPressTracker::new(DELAY);
        assert_eq!(presses.release(at(base, 0)), PressOutcome::Idle);
    }
}
