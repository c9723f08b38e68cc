use std::time::{Duration, Instant};

use super::timer_clock::{TimerClock, ticks_to_duration};

#[cfg(test)]
mod tests;

/// Monotonic clock used by relative timers.
///
/// The worker sleeps until the head deadline in a single wait.
#[derive(Debug)]
pub(crate) struct SteadyClock {
  origin: Instant,
}

impl SteadyClock {
  pub(crate) fn new() -> Self {
    Self { origin: Instant::now() }
  }
}

impl TimerClock for SteadyClock {
  fn now(&self) -> i64 {
    i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
  }

  fn wait_step(&self, now: i64, deadline: i64) -> Duration {
    ticks_to_duration(deadline.saturating_sub(now))
  }
}
