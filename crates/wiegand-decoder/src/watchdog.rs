//! Per-line inactivity watchdogs.
//!
//! Each data line gets a watchdog that fires when the line has seen no edge
//! for the bit timeout. While armed, a watchdog keeps firing once per window
//! until it is fed or disarmed, the same way GPIO daemon watchdogs behave.
//!
//! Watchdogs hold deadlines only. The decoder task sleeps until the
//! earliest armed deadline, so a disarmed watchdog can never deliver a late
//! firing. Deadlines are computed from event timestamps, not from when the
//! decoder got round to an event, and expired deadlines are replayed in
//! order before any later event.

use std::time::Duration;
use tokio::time::Instant;
use wiegand_core::Line;

/// Inactivity watchdog for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWatchdog {
    window: Duration,
    deadline: Option<Instant>,
}

impl LineWatchdog {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Start timing from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Restart the window after an edge. No effect when disarmed.
    pub fn feed(&mut self, now: Instant) {
        if self.deadline.is_some() {
            self.arm(now);
        }
    }

    /// Record a firing at `now` and schedule the next one.
    pub fn fired(&mut self, now: Instant) {
        self.feed(now);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

/// The DATA0/DATA1 watchdog pair of one decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogPair {
    zero: LineWatchdog,
    one: LineWatchdog,
}

impl WatchdogPair {
    pub fn new(window: Duration) -> Self {
        Self {
            zero: LineWatchdog::new(window),
            one: LineWatchdog::new(window),
        }
    }

    pub fn line(&self, line: Line) -> &LineWatchdog {
        match line {
            Line::Zero => &self.zero,
            Line::One => &self.one,
        }
    }

    pub fn line_mut(&mut self, line: Line) -> &mut LineWatchdog {
        match line {
            Line::Zero => &mut self.zero,
            Line::One => &mut self.one,
        }
    }

    pub fn arm_both(&mut self, now: Instant) {
        self.zero.arm(now);
        self.one.arm(now);
    }

    pub fn disarm_both(&mut self) {
        self.zero.disarm();
        self.one.disarm();
    }

    #[must_use]
    pub fn any_armed(&self) -> bool {
        self.zero.is_armed() || self.one.is_armed()
    }

    /// Earliest armed deadline strictly before `instant`. DATA0 wins ties.
    #[must_use]
    pub fn earliest_before(&self, instant: Instant) -> Option<(Line, Instant)> {
        [Line::Zero, Line::One]
            .into_iter()
            .filter_map(|line| Some((line, self.line(line).deadline()?)))
            .filter(|&(_, deadline)| deadline < instant)
            .min_by_key(|&(_, deadline)| deadline)
    }
}

/// Sleep until `deadline` and return it, or pend forever if there is none.
pub(crate) async fn expiry(deadline: Option<Instant>) -> Instant {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(deadline).await;
            deadline
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(5);

    #[test]
    fn test_new_watchdog_is_disarmed() {
        let dog = LineWatchdog::new(WINDOW);
        assert!(!dog.is_armed());
        assert_eq!(dog.deadline(), None);
    }

    #[test]
    fn test_arm_sets_deadline_one_window_ahead() {
        let now = Instant::now();
        let mut dog = LineWatchdog::new(WINDOW);
        dog.arm(now);
        assert_eq!(dog.deadline(), Some(now + WINDOW));
    }

    #[test]
    fn test_feed_restarts_window() {
        let now = Instant::now();
        let later = now + Duration::from_millis(3);
        let mut dog = LineWatchdog::new(WINDOW);
        dog.arm(now);
        dog.feed(later);
        assert_eq!(dog.deadline(), Some(later + WINDOW));
    }

    #[test]
    fn test_feed_does_not_arm() {
        let mut dog = LineWatchdog::new(WINDOW);
        dog.feed(Instant::now());
        assert!(!dog.is_armed());
    }

    #[test]
    fn test_fired_reschedules() {
        let now = Instant::now();
        let mut dog = LineWatchdog::new(WINDOW);
        dog.arm(now);
        dog.fired(now + WINDOW);
        assert_eq!(dog.deadline(), Some(now + WINDOW * 2));
    }

    #[test]
    fn test_pair_arm_and_disarm() {
        let now = Instant::now();
        let mut pair = WatchdogPair::new(WINDOW);
        assert!(!pair.any_armed());

        pair.arm_both(now);
        assert!(pair.line(Line::Zero).is_armed());
        assert!(pair.line(Line::One).is_armed());

        pair.line_mut(Line::One).feed(now + Duration::from_millis(1));
        assert_ne!(
            pair.line(Line::Zero).deadline(),
            pair.line(Line::One).deadline()
        );

        pair.disarm_both();
        assert!(!pair.any_armed());
    }

    #[test]
    fn test_earliest_before() {
        let now = Instant::now();
        let mut pair = WatchdogPair::new(WINDOW);
        assert_eq!(pair.earliest_before(now + WINDOW * 10), None);

        pair.arm_both(now);
        pair.line_mut(Line::Zero).feed(now + Duration::from_millis(2));

        // Deadlines: DATA1 at 5ms, DATA0 at 7ms.
        assert_eq!(pair.earliest_before(now + WINDOW), None);
        assert_eq!(
            pair.earliest_before(now + Duration::from_millis(6)),
            Some((Line::One, now + WINDOW))
        );
        assert_eq!(
            pair.earliest_before(now + WINDOW * 10),
            Some((Line::One, now + WINDOW))
        );

        pair.line_mut(Line::One).disarm();
        assert_eq!(
            pair.earliest_before(now + WINDOW * 10),
            Some((Line::Zero, now + Duration::from_millis(7)))
        );
    }

    #[test]
    fn test_earliest_before_prefers_zero_on_tie() {
        let now = Instant::now();
        let mut pair = WatchdogPair::new(WINDOW);
        pair.arm_both(now);
        assert_eq!(
            pair.earliest_before(now + WINDOW * 2),
            Some((Line::Zero, now + WINDOW))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_waits_for_deadline() {
        let start = Instant::now();
        let fired = expiry(Some(start + WINDOW)).await;
        assert_eq!(fired, start + WINDOW);
        assert!(Instant::now() >= start + WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_without_deadline_never_fires() {
        let result = tokio::time::timeout(Duration::from_secs(60), expiry(None)).await;
        assert!(result.is_err());
    }
}
