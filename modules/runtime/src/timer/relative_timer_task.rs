use std::sync::atomic::{AtomicI64, Ordering};

use fundament_utils_rs::panic::{PanicSink, TaskPanic};
use parking_lot::{Mutex, MutexGuard};

use super::{rearm_policy::RearmPolicy, timer_clock::TimerClock, timer_task::TimerTask, timer_task_id::TimerTaskId};


/// Callback of a relative task: receives the 1-based firing count, returns `false` to stop the series.
pub(crate) type PeriodCallback = Box<dyn FnMut(usize) -> bool + Send + 'static>;

struct RelativeState {
  enabled: bool,
  period:  i64,
  last:    i64,
  count:   usize,
}

/// Steady-clock task firing every `period` ticks, at most `max_count` times (`0` is unbounded).
///
/// Two locks are involved: `state` guards the schedule and is never held while user code runs, so
/// the period can be updated from inside the callback; `callback` is held for the whole firing, which
/// is what a waiting remover blocks on.
pub(crate) struct RelativeTimerTask {
  id:        TimerTaskId,
  policy:    RearmPolicy,
  max_count: usize,
  deadline:  AtomicI64,
  state:     Mutex<RelativeState>,
  callback:  Mutex<Option<PeriodCallback>>,
}

impl RelativeTimerTask {
  pub(crate) fn new(
    id: TimerTaskId,
    start: i64,
    period: i64,
    policy: RearmPolicy,
    max_count: usize,
    callback: PeriodCallback,
  ) -> Self {
    Self {
      id,
      policy,
      max_count,
      deadline: AtomicI64::new(start.saturating_add(period)),
      state: Mutex::new(RelativeState { enabled: true, period, last: start, count: 0 }),
      callback: Mutex::new(Some(callback)),
    }
  }

  /// Replaces the period; the next deadline becomes the last firing tick plus `period`.
  ///
  /// Precise tasks keep their phase grid and refuse updates.
  pub(crate) fn update_period(&self, period: i64) -> bool {
    if self.policy == RearmPolicy::Precise {
      return false;
    }
    let mut state = self.state.lock();
    if !state.enabled {
      return false;
    }
    state.period = period;
    self.deadline.store(state.last.saturating_add(period), Ordering::Release);
    true
  }

  fn finish(&self, mut slot: MutexGuard<'_, Option<PeriodCallback>>) -> bool {
    self.state.lock().enabled = false;
    *slot = None;
    false
  }
}

impl TimerTask for RelativeTimerTask {
  fn id(&self) -> TimerTaskId {
    self.id
  }

  fn deadline(&self) -> i64 {
    self.deadline.load(Ordering::Acquire)
  }

  fn emit(&self, now: i64, clock: &dyn TimerClock, panics: &PanicSink) -> bool {
    let mut slot = self.callback.lock();
    let count = {
      let mut state = self.state.lock();
      if !state.enabled {
        drop(state);
        return self.finish(slot);
      }
      state.last = now;
      state.count += 1;
      state.count
    };

    let keep_going = match slot.as_mut() {
      | Some(callback) => TaskPanic::catch(|| callback(count)).unwrap_or_else(|panic| {
        panics.report(&panic);
        true
      }),
      | None => false,
    };
    let exhausted = self.max_count != 0 && count >= self.max_count;
    if !keep_going || exhausted {
      return self.finish(slot);
    }

    let state = self.state.lock();
    if !state.enabled {
      drop(state);
      return self.finish(slot);
    }
    let next = self.policy.next_deadline(self.deadline(), state.last, state.period, clock.now());
    self.deadline.store(next, Ordering::Release);
    true
  }

  fn disable(&self, wait: bool) {
    self.state.lock().enabled = false;
    if wait {
      *self.callback.lock() = None;
    } else if let Some(mut slot) = self.callback.try_lock() {
      *slot = None;
    }
  }
}
