use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};


/// Blocking latch that releases its waiters once the count reaches zero.
#[derive(Debug, Default)]
pub struct CountDownLatch {
  count:   Mutex<usize>,
  condvar: Condvar,
}

impl CountDownLatch {
  /// Creates a latch that opens after `count` calls to [`count_down`](Self::count_down).
  #[must_use]
  pub fn new(count: usize) -> Self {
    Self { count: Mutex::new(count), condvar: Condvar::new() }
  }

  /// Returns the remaining count.
  #[must_use]
  pub fn count(&self) -> usize {
    *self.count.lock()
  }

  /// Decrements the count, waking all waiters when it reaches zero.
  pub fn count_down(&self) {
    let mut count = self.count.lock();
    if *count == 0 {
      return;
    }
    *count -= 1;
    if *count == 0 {
      self.condvar.notify_all();
    }
  }

  /// Re-arms the latch with a new count.
  pub fn reset(&self, count: usize) {
    let mut current = self.count.lock();
    *current = count;
    if count == 0 {
      self.condvar.notify_all();
    }
  }

  /// Blocks until the count reaches zero.
  pub fn wait(&self) {
    let mut count = self.count.lock();
    while *count > 0 {
      self.condvar.wait(&mut count);
    }
  }

  /// Blocks until the count reaches zero or `timeout` elapses.
  ///
  /// Returns `true` when the latch opened.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    let Some(deadline) = Instant::now().checked_add(timeout) else {
      self.wait();
      return true;
    };
    let mut count = self.count.lock();
    while *count > 0 {
      if self.condvar.wait_until(&mut count, deadline).timed_out() {
        break;
      }
    }
    *count == 0
  }
}
