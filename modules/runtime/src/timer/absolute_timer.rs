use fundament_utils_rs::panic::PanicHandler;

use super::{
  AbsoluteTarget, TimerConfig, TimerError, TimerTaskId, absolute_timer_task::AbsoluteTimerTask,
  timer_engine::TimerEngine, wall_clock::WallClock,
};


/// Timer for one-shot tasks due at a wall-clock instant.
///
/// Targets already in the past fire on the next worker iteration. Waits longer than a second are
/// taken in tenths of the remaining time, so the timer follows adjustments of the system clock.
pub struct AbsoluteTimer {
  engine: TimerEngine<WallClock, AbsoluteTimerTask>,
}

impl AbsoluteTimer {
  /// Creates a timer; no worker is spawned until a task is added (automatic mode) or
  /// [`start`](Self::start) is called.
  #[must_use]
  pub fn new(config: TimerConfig) -> Self {
    Self { engine: TimerEngine::new(WallClock::new(), config) }
  }

  /// Adds a task running once at `target`.
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidTarget`] when `target` lies outside the representable tick range.
  pub fn add_absolute_task<F>(&self, callback: F, target: AbsoluteTarget) -> Result<TimerTaskId, TimerError>
  where
    F: FnOnce() + Send + 'static, {
    let deadline = target.ticks().ok_or(TimerError::InvalidTarget)?;
    let task = AbsoluteTimerTask::new(self.engine.next_id(), deadline, Box::new(callback));
    Ok(self.engine.add_task(task))
  }

  /// Moves a pending task to a new target.
  ///
  /// Returns `false` when the task is unknown, already fired, or the target is out of range.
  pub fn update_task_target(&self, id: TimerTaskId, target: AbsoluteTarget) -> bool {
    let Some(deadline) = target.ticks() else {
      return false;
    };
    self.engine.update_task(id, |task| task.update_target(deadline))
  }

  /// Removes a task. With `wait`, blocks until an in-flight callback returned; from inside a timer
  /// callback `wait` is ignored.
  pub fn remove_task(&self, id: TimerTaskId, wait: bool) -> bool {
    self.engine.remove_task(id, wait)
  }

  /// Starts the worker. No-op when already running or called from a timer callback.
  pub fn start(&self) {
    self.engine.start();
  }

  /// Stops the worker and discards every pending task.
  ///
  /// From a callback this returns at once when another thread is already stopping the timer.
  pub fn stop(&self) {
    self.engine.stop();
  }

  /// Returns whether the worker is running.
  #[must_use]
  pub fn is_running(&self) -> bool {
    self.engine.is_running()
  }

  /// Number of scheduled tasks.
  #[must_use]
  pub fn len(&self) -> usize {
    self.engine.len()
  }

  /// Returns `true` when no task is scheduled.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.engine.is_empty()
  }

  /// Installs or clears the handler receiving callback panics.
  pub fn set_panic_handler(&self, handler: Option<PanicHandler>) {
    self.engine.set_panic_handler(handler);
  }
}

impl Default for AbsoluteTimer {
  fn default() -> Self {
    Self::new(TimerConfig::new())
  }
}
