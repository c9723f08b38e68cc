use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};


/// Binary event used to park worker threads.
///
/// [`notify`](Self::notify) wakes a single waiter and the signal is consumed by that waiter.
/// [`notify_all`](Self::notify_all) latches the event open: every current and future waiter
/// passes through until [`reset`](Self::reset) is called.
#[derive(Debug, Default)]
pub struct Event {
  state:   Mutex<EventState>,
  condvar: Condvar,
}

#[derive(Debug, Default)]
struct EventState {
  signaled: bool,
  latched:  bool,
}

impl EventState {
  const fn is_ready(&self) -> bool {
    self.signaled || self.latched
  }
}

impl Event {
  /// Creates an event in the non-signaled state.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Clears both the single-shot signal and the latch.
  pub fn reset(&self) {
    let mut state = self.state.lock();
    state.signaled = false;
    state.latched = false;
  }

  /// Blocks until the event is signaled.
  pub fn wait(&self) {
    let mut state = self.state.lock();
    while !state.is_ready() {
      self.condvar.wait(&mut state);
    }
    state.signaled = false;
  }

  /// Blocks until the event is signaled or `timeout` elapses.
  ///
  /// Returns `true` when the event was signaled.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    match Instant::now().checked_add(timeout) {
      | Some(deadline) => self.wait_until(deadline),
      | None => {
        self.wait();
        true
      },
    }
  }

  /// Blocks until the event is signaled or `deadline` is reached.
  ///
  /// Returns `true` when the event was signaled.
  pub fn wait_until(&self, deadline: Instant) -> bool {
    let mut state = self.state.lock();
    while !state.is_ready() {
      if self.condvar.wait_until(&mut state, deadline).timed_out() {
        break;
      }
    }
    let ready = state.is_ready();
    if ready {
      state.signaled = false;
    }
    ready
  }

  /// Signals the event, waking at most one waiter.
  pub fn notify(&self) {
    let mut state = self.state.lock();
    state.signaled = true;
    self.condvar.notify_one();
  }

  /// Latches the event open and wakes every waiter.
  pub fn notify_all(&self) {
    let mut state = self.state.lock();
    state.latched = true;
    self.condvar.notify_all();
  }
}
