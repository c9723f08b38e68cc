use std::time::Duration;

/// Tick source driving a timer engine.
///
/// Ticks are signed nanoseconds relative to a clock specific origin.
pub(crate) trait TimerClock: Send + Sync + 'static {
  /// Current tick.
  fn now(&self) -> i64;

  /// How long the worker sleeps before re-checking a head task due at `deadline`.
  fn wait_step(&self, now: i64, deadline: i64) -> Duration;
}

/// Converts a duration into ticks, `None` when it does not fit.
pub(crate) fn duration_to_ticks(duration: Duration) -> Option<i64> {
  i64::try_from(duration.as_nanos()).ok()
}

/// Converts a non-negative tick delta into a duration; negative deltas become zero.
pub(crate) fn ticks_to_duration(ticks: i64) -> Duration {
  Duration::from_nanos(u64::try_from(ticks).unwrap_or(0))
}
