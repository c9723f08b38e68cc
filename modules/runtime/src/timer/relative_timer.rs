use std::time::Duration;

use fundament_utils_rs::panic::PanicHandler;

use super::{
  TimerConfig, TimerError, TimerTaskId,
  rearm_policy::RearmPolicy,
  relative_timer_task::{PeriodCallback, RelativeTimerTask},
  steady_clock::SteadyClock,
  timer_clock::{TimerClock, duration_to_ticks},
  timer_engine::TimerEngine,
};

#[cfg(test)]
mod tests;

/// Timer for delays and periods measured on the monotonic clock.
///
/// Every `add_*` method returns the task identifier used for updates and removal. Periodic variants
/// take an `execute_count`; `0` repeats until the task is removed or the timer stops.
///
/// Simple tasks re-arm from the moment they fired, so a slow callback delays the rest of the series.
/// Precise tasks stay on the phase grid established at registration and skip periods a slow callback
/// overran.
///
/// # Examples
///
/// ```
/// use std::{sync::mpsc, time::Duration};
///
/// use fundament_runtime_rs::timer::{RelativeTimer, TimerConfig};
///
/// let timer = RelativeTimer::new(TimerConfig::new());
/// let (tx, rx) = mpsc::channel();
/// timer.add_delay_task(move || tx.send("fired").unwrap(), Duration::from_millis(10)).unwrap();
/// assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("fired"));
/// ```
pub struct RelativeTimer {
  engine: TimerEngine<SteadyClock, RelativeTimerTask>,
}

impl RelativeTimer {
  /// Creates a timer; no worker is spawned until a task is added (automatic mode) or
  /// [`start`](Self::start) is called.
  #[must_use]
  pub fn new(config: TimerConfig) -> Self {
    Self { engine: TimerEngine::new(SteadyClock::new(), config) }
  }

  /// Adds a periodic task whose callback receives the 1-based firing count and returns `false` to end
  /// the series.
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidPeriod`] when `period` is zero or too large.
  pub fn add_period_task<F>(&self, callback: F, period: Duration, execute_count: usize) -> Result<TimerTaskId, TimerError>
  where
    F: FnMut(usize) -> bool + Send + 'static, {
    self.add_series(Box::new(callback), period, RearmPolicy::Simple, execute_count)
  }

  /// Adds a periodic task with a plain callback.
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidPeriod`] when `period` is zero or too large.
  pub fn add_simple_period_task<F>(
    &self,
    mut callback: F,
    period: Duration,
    execute_count: usize,
  ) -> Result<TimerTaskId, TimerError>
  where
    F: FnMut() + Send + 'static, {
    self.add_period_task(
      move |_| {
        callback();
        true
      },
      period,
      execute_count,
    )
  }

  /// Precise counterpart of [`add_period_task`](Self::add_period_task).
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidPeriod`] when `period` is zero or too large.
  pub fn add_precise_period_task<F>(
    &self,
    callback: F,
    period: Duration,
    execute_count: usize,
  ) -> Result<TimerTaskId, TimerError>
  where
    F: FnMut(usize) -> bool + Send + 'static, {
    self.add_series(Box::new(callback), period, RearmPolicy::Precise, execute_count)
  }

  /// Precise counterpart of [`add_simple_period_task`](Self::add_simple_period_task).
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidPeriod`] when `period` is zero or too large.
  pub fn add_simple_precise_period_task<F>(
    &self,
    mut callback: F,
    period: Duration,
    execute_count: usize,
  ) -> Result<TimerTaskId, TimerError>
  where
    F: FnMut() + Send + 'static, {
    self.add_precise_period_task(
      move |_| {
        callback();
        true
      },
      period,
      execute_count,
    )
  }

  /// Adds a one-shot task running `delay` from now. A zero delay fires on the next worker iteration.
  ///
  /// The delay can be changed with [`update_task_period`](Self::update_task_period) until the task fires.
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidPeriod`] when `delay` is too large.
  pub fn add_delay_task<F>(&self, callback: F, delay: Duration) -> Result<TimerTaskId, TimerError>
  where
    F: FnOnce() + Send + 'static, {
    let delay = duration_to_ticks(delay).ok_or(TimerError::InvalidPeriod)?;
    let mut callback = Some(callback);
    let once: PeriodCallback = Box::new(move |_| {
      if let Some(callback) = callback.take() {
        callback();
      }
      false
    });
    let task = RelativeTimerTask::new(self.engine.next_id(), self.engine.clock().now(), delay, RearmPolicy::Simple, 1, once);
    Ok(self.engine.add_task(task))
  }

  /// Changes the period of a simple or delay task; the next firing is the last firing (or the
  /// registration, if none yet) plus `period`.
  ///
  /// Returns `false` for precise tasks, unknown or finished tasks, and zero periods. Safe to call from
  /// inside the task's own callback.
  pub fn update_task_period(&self, id: TimerTaskId, period: Duration) -> bool {
    let Ok(period) = period_ticks(period) else {
      return false;
    };
    self.engine.update_task(id, |task| task.update_period(period))
  }

  /// Removes a task. With `wait`, blocks until an in-flight callback returned and its captured state
  /// was dropped; from inside a timer callback `wait` is ignored.
  ///
  /// Returns `false` when the identifier is unknown or the task already finished.
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

  fn add_series(
    &self,
    callback: PeriodCallback,
    period: Duration,
    policy: RearmPolicy,
    execute_count: usize,
  ) -> Result<TimerTaskId, TimerError> {
    let period = period_ticks(period)?;
    let task = RelativeTimerTask::new(self.engine.next_id(), self.engine.clock().now(), period, policy, execute_count, callback);
    Ok(self.engine.add_task(task))
  }
}

impl Default for RelativeTimer {
  fn default() -> Self {
    Self::new(TimerConfig::new())
  }
}

fn period_ticks(period: Duration) -> Result<i64, TimerError> {
  match duration_to_ticks(period) {
    | Some(ticks) if ticks > 0 => Ok(ticks),
    | _ => Err(TimerError::InvalidPeriod),
  }
}
