use std::time::Duration;


/// Default idle period after which an automatic timer worker retires.
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration shared by [`RelativeTimer`](super::RelativeTimer) and [`AbsoluteTimer`](super::AbsoluteTimer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerConfig {
  automatic:    bool,
  thread_name:  Option<String>,
  idle_timeout: Duration,
}

impl TimerConfig {
  /// Creates the default configuration: automatic mode, unnamed worker, one minute idle timeout.
  #[must_use]
  pub const fn new() -> Self {
    Self { automatic: true, thread_name: None, idle_timeout: DEFAULT_IDLE_TIMEOUT }
  }

  /// Enables or disables automatic mode.
  ///
  /// In automatic mode the worker starts on the first added task and retires after it has been idle
  /// for [`idle_timeout`](Self::idle_timeout). In manual mode only `start`/`stop` control the worker.
  #[must_use]
  pub fn with_automatic(mut self, automatic: bool) -> Self {
    self.automatic = automatic;
    self
  }

  /// Sets the label embedded in the worker thread name.
  #[must_use]
  pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
    self.thread_name = Some(name.into());
    self
  }

  /// Overrides the idle timeout.
  #[must_use]
  pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
    self.idle_timeout = idle_timeout;
    self
  }

  /// Returns whether automatic mode is enabled.
  #[must_use]
  pub const fn automatic(&self) -> bool {
    self.automatic
  }

  /// Returns the worker thread label.
  #[must_use]
  pub fn thread_name(&self) -> Option<&str> {
    self.thread_name.as_deref()
  }

  /// Returns the idle timeout.
  #[must_use]
  pub const fn idle_timeout(&self) -> Duration {
    self.idle_timeout
  }
}

impl Default for TimerConfig {
  fn default() -> Self {
    Self::new()
  }
}
