use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::timer_clock::{TimerClock, ticks_to_duration};


/// Remaining time below which the worker sleeps straight to the deadline.
const FINE_WAIT_THRESHOLD: i64 = 1_000_000_000;

/// Wall clock used by absolute timers.
///
/// Ticks are nanoseconds since the UNIX epoch. Long waits are split into tenths of the remaining time
/// so that wall-clock adjustments are noticed before the deadline is overshot.
#[derive(Debug, Default)]
pub(crate) struct WallClock;

impl WallClock {
  pub(crate) const fn new() -> Self {
    Self
  }
}

impl TimerClock for WallClock {
  fn now(&self) -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
      | Ok(elapsed) => i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX),
      | Err(error) => i64::try_from(error.duration().as_nanos()).map_or(i64::MIN, |before| -before),
    }
  }

  fn wait_step(&self, now: i64, deadline: i64) -> Duration {
    let remaining = deadline.saturating_sub(now);
    if remaining < FINE_WAIT_THRESHOLD { ticks_to_duration(remaining) } else { ticks_to_duration(remaining / 10) }
  }
}
