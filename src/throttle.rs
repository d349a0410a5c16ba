//! Time-based tick throttling with trailing-edge delivery.
//!
//! A value offered while the window is still open is parked as pending;
//! later offers in the same window replace it. Once the window elapses the
//! pending value is handed out by [`Throttle::take_due`], so the last value
//! of every window is processed even when no further input arrives.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct Throttle {
    last_run: Option<Instant>,
    pending: Option<f32>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    fn window_elapsed(&self, now: Instant, interval: Duration) -> bool {
        match self.last_run {
            Some(last) => now.saturating_duration_since(last) >= interval,
            None => true,
        }
    }

    /// Offer a value. Returns it back if it should be processed now,
    /// otherwise keeps it as the pending value.
    pub fn offer(&mut self, value: f32, now: Instant, interval: Duration) -> Option<f32> {
        if self.window_elapsed(now, interval) {
            self.last_run = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// The pending value, once its window has elapsed.
    pub fn take_due(&mut self, now: Instant, interval: Duration) -> Option<f32> {
        if self.pending.is_some() && self.window_elapsed(now, interval) {
            self.last_run = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Time left until a pending value becomes due, `None` without one.
    pub fn time_until_due(&self, now: Instant, interval: Duration) -> Option<Duration> {
        self.pending?;
        let due = match self.last_run {
            Some(last) => (last + interval).saturating_duration_since(now),
            None => Duration::ZERO,
        };
        Some(due)
    }

    pub fn pending(&self) -> Option<f32> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.last_run = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(16);

    #[test]
    fn test_first_offer_runs_immediately() {
        let mut throttle = Throttle::new();
        assert_eq!(throttle.offer(10.0, Instant::now(), WINDOW), Some(10.0));
        assert_eq!(throttle.pending(), None);
    }

    #[test]
    fn test_offers_within_window_coalesce() {
        let start = Instant::now();
        let mut throttle = Throttle::new();
        throttle.offer(0.0, start, WINDOW);

        assert_eq!(throttle.offer(5.0, start + Duration::from_millis(4), WINDOW), None);
        assert_eq!(throttle.offer(9.0, start + Duration::from_millis(8), WINDOW), None);
        assert_eq!(throttle.pending(), Some(9.0));

        // Not due yet
        assert_eq!(throttle.take_due(start + Duration::from_millis(10), WINDOW), None);
        // Trailing edge delivers the latest value
        assert_eq!(throttle.take_due(start + WINDOW, WINDOW), Some(9.0));
        assert_eq!(throttle.take_due(start + WINDOW * 3, WINDOW), None);
    }

    #[test]
    fn test_offer_after_window_runs_and_drops_pending() {
        let start = Instant::now();
        let mut throttle = Throttle::new();
        throttle.offer(0.0, start, WINDOW);
        throttle.offer(1.0, start + Duration::from_millis(1), WINDOW);

        assert_eq!(throttle.offer(2.0, start + WINDOW, WINDOW), Some(2.0));
        assert_eq!(throttle.pending(), None);
    }

    #[test]
    fn test_time_until_due() {
        let start = Instant::now();
        let mut throttle = Throttle::new();
        assert_eq!(throttle.time_until_due(start, WINDOW), None);

        throttle.offer(0.0, start, WINDOW);
        throttle.offer(1.0, start + Duration::from_millis(6), WINDOW);
        assert_eq!(
            throttle.time_until_due(start + Duration::from_millis(6), WINDOW),
            Some(Duration::from_millis(10))
        );
        assert_eq!(
            throttle.time_until_due(start + WINDOW * 2, WINDOW),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_clear_resets_window() {
        let start = Instant::now();
        let mut throttle = Throttle::new();
        throttle.offer(0.0, start, WINDOW);
        throttle.offer(1.0, start, WINDOW);
        throttle.clear();

        assert_eq!(throttle.pending(), None);
        assert_eq!(throttle.offer(3.0, start, WINDOW), Some(3.0));
    }
}
