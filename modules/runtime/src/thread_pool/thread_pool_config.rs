use std::{thread, time::Duration};


const DEFAULT_CORE_SIZE: usize = 2;
const DEFAULT_TASK_BLOCK_QUEUE_SIZE: usize = 1;
const DEFAULT_TEMP_WORKER_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for [`ThreadPool`](super::ThreadPool).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadPoolConfig {
  core_size:                usize,
  max_size:                 usize,
  auto_expansion:           bool,
  automatic:                bool,
  thread_name:              Option<String>,
  task_block_queue_size:    usize,
  temp_worker_idle_timeout: Duration,
}

impl ThreadPoolConfig {
  /// Creates the default configuration.
  ///
  /// Two core workers, no expansion, `max_size` equal to the available parallelism (at least the core
  /// size), automatic start, expansion threshold of one queued task, one minute idle timeout.
  #[must_use]
  pub fn new() -> Self {
    let parallelism = thread::available_parallelism().map_or(DEFAULT_CORE_SIZE, |count| count.get());
    Self {
      core_size:                DEFAULT_CORE_SIZE,
      max_size:                 parallelism.max(DEFAULT_CORE_SIZE),
      auto_expansion:           false,
      automatic:                true,
      thread_name:              None,
      task_block_queue_size:    DEFAULT_TASK_BLOCK_QUEUE_SIZE,
      temp_worker_idle_timeout: DEFAULT_TEMP_WORKER_IDLE_TIMEOUT,
    }
  }

  /// Sets the number of core workers.
  #[must_use]
  pub fn with_core_size(mut self, core_size: usize) -> Self {
    self.core_size = core_size;
    self
  }

  /// Sets the upper bound on live workers, core and temporary together.
  #[must_use]
  pub fn with_max_size(mut self, max_size: usize) -> Self {
    self.max_size = max_size;
    self
  }

  /// Enables spawning temporary workers when the queue backs up.
  #[must_use]
  pub fn with_auto_expansion(mut self, auto_expansion: bool) -> Self {
    self.auto_expansion = auto_expansion;
    self
  }

  /// Enables starting the pool on the first submission.
  #[must_use]
  pub fn with_automatic(mut self, automatic: bool) -> Self {
    self.automatic = automatic;
    self
  }

  /// Sets the label embedded in worker thread names.
  #[must_use]
  pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
    self.thread_name = Some(name.into());
    self
  }

  /// Sets how many queued tasks are tolerated before expansion kicks in.
  #[must_use]
  pub fn with_task_block_queue_size(mut self, size: usize) -> Self {
    self.task_block_queue_size = size;
    self
  }

  /// Sets how long a temporary worker idles before retiring.
  #[must_use]
  pub fn with_temp_worker_idle_timeout(mut self, timeout: Duration) -> Self {
    self.temp_worker_idle_timeout = timeout;
    self
  }

  /// Returns the number of core workers.
  #[must_use]
  pub const fn core_size(&self) -> usize {
    self.core_size
  }

  /// Returns the worker upper bound.
  #[must_use]
  pub const fn max_size(&self) -> usize {
    self.max_size
  }

  /// Returns whether the pool expands under load.
  #[must_use]
  pub const fn auto_expansion(&self) -> bool {
    self.auto_expansion
  }

  /// Returns whether the pool starts on first submission.
  #[must_use]
  pub const fn automatic(&self) -> bool {
    self.automatic
  }

  /// Returns the worker thread label.
  #[must_use]
  pub fn thread_name(&self) -> Option<&str> {
    self.thread_name.as_deref()
  }

  /// Returns the initial expansion threshold.
  #[must_use]
  pub const fn task_block_queue_size(&self) -> usize {
    self.task_block_queue_size
  }

  /// Returns the temporary worker idle timeout.
  #[must_use]
  pub const fn temp_worker_idle_timeout(&self) -> Duration {
    self.temp_worker_idle_timeout
  }
}

impl Default for ThreadPoolConfig {
  fn default() -> Self {
    Self::new()
  }
}
