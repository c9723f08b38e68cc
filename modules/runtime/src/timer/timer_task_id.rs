use std::fmt;


/// Identifier returned when a task is added to a timer.
///
/// Identifiers are strictly increasing per timer instance and never `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerTaskId(u64);

impl TimerTaskId {
  /// Creates an identifier from its raw value.
  #[must_use]
  pub const fn new(raw: u64) -> Self {
    Self(raw)
  }

  /// Returns the raw identifier.
  #[must_use]
  pub const fn raw(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for TimerTaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "timer-task-{}", self.0)
  }
}
