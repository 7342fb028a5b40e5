// Chordkeys Fixed Rate Loop
// Deadline-based tick pacing

use std::time::{Duration, Instant};

/// Paces the dispatch loop at a fixed rate.
///
/// Deadlines advance by exactly one period per tick so sleep jitter does not
/// accumulate. A tick that finishes after its deadline counts as an overrun
/// and the schedule restarts from the current time.
#[derive(Debug, Clone)]
pub struct FixedRateLoop {
    period: Duration,
    deadline: Instant,
    ticks: u64,
    overruns: u64,
}

impl FixedRateLoop {
    pub const DEFAULT_RATE_HZ: u32 = 500;
    pub const MIN_RATE_HZ: u32 = 200;

    pub fn new(rate_hz: u32, start: Instant) -> Self {
        let period = Duration::from_secs(1) / rate_hz.max(1);
        Self {
            period,
            deadline: start + period,
            ticks: 0,
            overruns: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Time to sleep before the next tick; moves the deadline forward
    pub fn next_sleep(&mut self, now: Instant) -> Duration {
        self.ticks += 1;
        if now > self.deadline {
            self.overruns += 1;
            log::trace!("tick {} overran by {:?}", self.ticks, now - self.deadline);
            self.deadline = now + self.period;
            return Duration::ZERO;
        }
        let sleep = self.deadline - now;
        self.deadline += self.period;
        sleep
    }

    /// Sleep until the next tick
    pub fn wait(&mut self) {
        let sleep = self.next_sleep(Instant::now());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_rate() {
        let start = Instant::now();
        assert_eq!(FixedRateLoop::new(500, start).period(), Duration::from_millis(2));
        assert_eq!(FixedRateLoop::new(200, start).period(), Duration::from_millis(5));
    }

    #[test]
    fn test_sleep_fills_remaining_period() {
        let start = Instant::now();
        let mut pacer = FixedRateLoop::new(500, start);
        let sleep = pacer.next_sleep(start + Duration::from_micros(500));
        assert_eq!(sleep, Duration::from_micros(1500));

        // Second deadline sits one period after the first
        let sleep = pacer.next_sleep(start + Duration::from_millis(3));
        assert_eq!(sleep, Duration::from_millis(1));
        assert_eq!(pacer.overruns(), 0);
        assert_eq!(pacer.ticks(), 2);
    }

    #[test]
    fn test_overrun_resynchronises() {
        let start = Instant::now();
        let mut pacer = FixedRateLoop::new(500, start);
        let late = start + Duration::from_millis(10);
        assert_eq!(pacer.next_sleep(late), Duration::ZERO);
        assert_eq!(pacer.overruns(), 1);

        let sleep = pacer.next_sleep(late + Duration::from_millis(1));
        assert_eq!(sleep, Duration::from_millis(1));
    }
}
