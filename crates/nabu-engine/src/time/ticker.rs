use std::time::{Duration, Instant};

/// Periodic tick-boundary scheduler.
///
/// `wait` blocks until the next boundary. Boundaries that were already missed
/// (the frame took longer than one interval) are dropped, not replayed, so a
/// slow frame is followed by exactly one immediate tick.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_nanos(1)),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the period and re-arms the ticker from the next `wait`.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.max(Duration::from_nanos(1));
        self.next = None;
    }

    /// Advances to the next boundary and returns how long to sleep from `now`.
    pub fn schedule(&mut self, now: Instant) -> Duration {
        let deadline = match self.next {
            Some(prev) => prev + self.interval,
            None => now + self.interval,
        };
        let deadline = deadline.max(now);
        self.next = Some(deadline);
        deadline - now
    }

    /// Blocks the calling thread until the next tick boundary.
    pub fn wait(&mut self) {
        let sleep = self.schedule(Instant::now());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_wait_is_one_interval() {
        let t0 = Instant::now();
        let mut t = Ticker::new(ms(16));
        assert_eq!(t.schedule(t0), ms(16));
    }

    #[test]
    fn boundaries_are_periodic_not_relative() {
        let t0 = Instant::now();
        let mut t = Ticker::new(ms(16));
        t.schedule(t0);
        // Frame finished 5ms after the first boundary.
        assert_eq!(t.schedule(t0 + ms(21)), ms(11));
    }

    #[test]
    fn missed_boundaries_are_dropped() {
        let t0 = Instant::now();
        let mut t = Ticker::new(ms(10));
        t.schedule(t0);
        assert_eq!(t.schedule(t0 + ms(95)), Duration::ZERO);
        assert_eq!(t.schedule(t0 + ms(95)), ms(10));
    }

    #[test]
    fn set_interval_rearms() {
        let t0 = Instant::now();
        let mut t = Ticker::new(ms(10));
        t.schedule(t0);
        t.set_interval(ms(40));
        assert_eq!(t.schedule(t0 + ms(3)), ms(40));
    }

    #[test]
    fn zero_interval_becomes_minimum() {
        assert_eq!(Ticker::new(Duration::ZERO).interval(), Duration::from_nanos(1));
    }
}
