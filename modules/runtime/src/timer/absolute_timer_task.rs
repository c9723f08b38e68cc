use std::sync::atomic::{AtomicI64, Ordering};

use fundament_utils_rs::panic::{PanicSink, TaskPanic};
use parking_lot::Mutex;

use super::{timer_clock::TimerClock, timer_task::TimerTask, timer_task_id::TimerTaskId};

#[cfg(test)]
mod tests;

/// One-shot callback of an absolute task.
pub(crate) type OnceCallback = Box<dyn FnOnce() + Send + 'static>;

/// Wall-clock task firing once at its target.
pub(crate) struct AbsoluteTimerTask {
  id:       TimerTaskId,
  deadline: AtomicI64,
  enabled:  Mutex<bool>,
  callback: Mutex<Option<OnceCallback>>,
}

impl AbsoluteTimerTask {
  pub(crate) fn new(id: TimerTaskId, deadline: i64, callback: OnceCallback) -> Self {
    Self { id, deadline: AtomicI64::new(deadline), enabled: Mutex::new(true), callback: Mutex::new(Some(callback)) }
  }

  /// Moves the target; refused once the task fired or was disabled.
  pub(crate) fn update_target(&self, deadline: i64) -> bool {
    let enabled = self.enabled.lock();
    if !*enabled {
      return false;
    }
    self.deadline.store(deadline, Ordering::Release);
    true
  }
}

impl TimerTask for AbsoluteTimerTask {
  fn id(&self) -> TimerTaskId {
    self.id
  }

  fn deadline(&self) -> i64 {
    self.deadline.load(Ordering::Acquire)
  }

  fn emit(&self, _now: i64, _clock: &dyn TimerClock, panics: &PanicSink) -> bool {
    let mut slot = self.callback.lock();
    {
      let mut enabled = self.enabled.lock();
      if !*enabled {
        *slot = None;
        return false;
      }
      *enabled = false;
    }
    if let Some(callback) = slot.take() {
      if let Err(panic) = TaskPanic::catch(callback) {
        panics.report(&panic);
      }
    }
    false
  }

  fn disable(&self, wait: bool) {
    *self.enabled.lock() = false;
    if wait {
      *self.callback.lock() = None;
    } else if let Some(mut slot) = self.callback.try_lock() {
      *slot = None;
    }
  }
}
