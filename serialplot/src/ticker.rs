use std::time::{Duration, Instant};

/// Fixed-period deadline, polled from the frame loop.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// True at most once per period. The first call is always due.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now < next => false,
            Some(next) => {
                // Skip missed periods instead of firing a burst
                let mut next = next + self.period;
                if next <= now {
                    next = now + self.period;
                }
                self.next = Some(next);
                true
            }
            None => {
                self.next = Some(now + self.period);
                true
            }
        }
    }

    /// Time left until the next tick.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next
            .map(|next| next.saturating_duration_since(now))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_per_period() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(33 * MS);
        assert!(ticker.due(t0));
        assert!(!ticker.due(t0 + 10 * MS));
        assert!(ticker.due(t0 + 33 * MS));
        assert!(!ticker.due(t0 + 40 * MS));
        assert!(ticker.due(t0 + 66 * MS));
    }

    #[test]
    fn missed_periods_collapse() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(10 * MS);
        assert!(ticker.due(t0));
        assert!(ticker.due(t0 + 100 * MS));
        assert!(!ticker.due(t0 + 105 * MS));
        assert_eq!(ticker.remaining(t0 + 105 * MS), 5 * MS);
    }

    #[test]
    fn remaining_is_zero_before_first_tick() {
        let ticker = Ticker::new(200 * MS);
        assert_eq!(ticker.remaining(Instant::now()), Duration::ZERO);
    }
}
