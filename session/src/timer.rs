//! Periodic cadence driven from an external frame clock.

use std::time::Duration;

/// Accumulates elapsed time and fires once per period.
///
/// A single update fires at most once; time beyond the firing period is
/// carried over modulo the period, so a long stall never triggers a burst
/// of catch-up ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CadenceTimer {
    period: Duration,
    accumulated: Duration,
}

impl CadenceTimer {
    /// Creates a timer that fires every `period`.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
        }
    }

    /// Interval between firings.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Time accumulated toward the next firing.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Changes the interval without discarding accumulated time.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Adds `elapsed` and reports whether the timer fired.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated = self.accumulated.saturating_add(elapsed);
        if self.period.is_zero() {
            self.accumulated = Duration::ZERO;
            return true;
        }
        if self.accumulated < self.period {
            return false;
        }

        let remainder = self.accumulated.as_nanos() % self.period.as_nanos();
        self.accumulated = Duration::from_nanos(u64::try_from(remainder).unwrap_or(0));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let mut timer = CadenceTimer::new(Duration::from_millis(50));
        assert!(!timer.advance(Duration::from_millis(30)));
        assert!(timer.advance(Duration::from_millis(30)));
        assert_eq!(timer.accumulated(), Duration::from_millis(10));
        assert!(!timer.advance(Duration::from_millis(30)));
        assert!(timer.advance(Duration::from_millis(10)));
    }

    #[test]
    fn long_frames_fire_only_once() {
        let mut timer = CadenceTimer::new(Duration::from_millis(20));
        assert!(timer.advance(Duration::from_millis(75)));
        assert_eq!(timer.accumulated(), Duration::from_millis(15));
        assert!(timer.advance(Duration::from_millis(5)));
        assert_eq!(timer.accumulated(), Duration::ZERO);
    }

    #[test]
    fn zero_period_fires_every_update() {
        let mut timer = CadenceTimer::new(Duration::ZERO);
        assert!(timer.advance(Duration::ZERO));
        assert!(timer.advance(Duration::from_millis(1)));
    }

    #[test]
    fn changing_period_keeps_progress() {
        let mut timer = CadenceTimer::new(Duration::from_millis(50));
        assert!(!timer.advance(Duration::from_millis(40)));
        timer.set_period(Duration::from_millis(100));
        assert!(!timer.advance(Duration::from_millis(40)));
        assert!(timer.advance(Duration::from_millis(20)));
        assert_eq!(timer.period(), Duration::from_millis(100));
    }
}
