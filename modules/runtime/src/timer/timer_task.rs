use fundament_utils_rs::panic::PanicSink;

use super::{timer_clock::TimerClock, timer_task_id::TimerTaskId};

/// Task scheduled on a timer engine.
///
/// The deadline is readable without locking so the engine can order tasks while a callback runs.
pub(crate) trait TimerTask: Send + Sync + 'static {
  /// Identifier assigned at registration.
  fn id(&self) -> TimerTaskId;

  /// Next due tick.
  fn deadline(&self) -> i64;

  /// Runs the callback for a firing due at or before `now`.
  ///
  /// Returns `true` when the task stays scheduled with a new deadline.
  fn emit(&self, now: i64, clock: &dyn TimerClock, panics: &PanicSink) -> bool;

  /// Disables the task and releases its callback.
  ///
  /// With `wait` the call blocks until an in-flight callback has returned.
  fn disable(&self, wait: bool);
}
