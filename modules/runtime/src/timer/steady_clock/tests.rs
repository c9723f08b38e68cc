use std::{thread, time::Duration};

use super::SteadyClock;
use crate::timer::timer_clock::TimerClock;

#[test]
fn ticks_are_monotonic() {
  let clock = SteadyClock::new();
  let first = clock.now();
  thread::sleep(Duration::from_millis(5));
  let second = clock.now();
  assert!(first >= 0);
  assert!(second - first >= 5_000_000);
}

#[test]
fn waits_the_full_remaining_time() {
  let clock = SteadyClock::new();
  assert_eq!(clock.wait_step(0, 5_000_000_000), Duration::from_secs(5));
  assert_eq!(clock.wait_step(100, 50), Duration::ZERO);
}
