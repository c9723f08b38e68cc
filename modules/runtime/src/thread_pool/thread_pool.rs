use std::{
  sync::{Arc, mpsc},
  thread::ThreadId,
};

use fundament_utils_rs::panic::{PanicHandler, TaskPanic};
use tracing::trace;

use super::{
  TaskHandle, ThreadPoolConfig, ThreadPoolError,
  pool_shared::{LOG_TARGET, PoolShared},
};


/// Elastic pool of OS worker threads.
///
/// `core_size` workers live from start until stop. With auto expansion enabled, a submission that
/// finds more than `task_block_queue_size` tasks queued spawns a temporary worker (up to `max_size`);
/// temporary workers retire after idling for the configured timeout. Submissions made from pool
/// threads never start or expand the pool.
///
/// Stopping (explicitly or on drop) joins every worker and discards tasks that did not run yet.
///
/// # Examples
///
/// ```
/// use fundament_runtime_rs::thread_pool::{ThreadPool, ThreadPoolConfig};
///
/// let pool = ThreadPool::new(ThreadPoolConfig::new()).unwrap();
/// let handle = pool.commit(|| 6 * 7);
/// assert_eq!(handle.join(), Ok(42));
/// ```
pub struct ThreadPool {
  shared: Arc<PoolShared>,
}

impl ThreadPool {
  /// Creates a pool. Workers are spawned on [`start`](Self::start) or, in automatic mode, on the
  /// first submission.
  ///
  /// # Errors
  ///
  /// Returns [`ThreadPoolError::NoWorkers`] when `core_size` is zero without auto expansion, and
  /// [`ThreadPoolError::InvalidMaxSize`] when `max_size` is zero or below `core_size`.
  pub fn new(config: ThreadPoolConfig) -> Result<Self, ThreadPoolError> {
    if config.core_size() == 0 && !config.auto_expansion() {
      return Err(ThreadPoolError::NoWorkers);
    }
    if config.max_size() == 0 || config.max_size() < config.core_size() {
      return Err(ThreadPoolError::InvalidMaxSize { core_size: config.core_size(), max_size: config.max_size() });
    }
    Ok(Self { shared: Arc::new(PoolShared::new(config)) })
  }

  /// Returns the configuration the pool was built with.
  #[must_use]
  pub fn config(&self) -> &ThreadPoolConfig {
    self.shared.config()
  }

  /// Spawns the core workers. No-op when running or called from a pool thread.
  pub fn start(&self) {
    self.shared.start();
  }

  /// Joins every worker and discards queued tasks.
  ///
  /// From a pool task this returns at once when another thread is already stopping the pool.
  pub fn stop(&self) {
    self.shared.stop();
  }

  /// Submits a fire-and-forget task. Panics are routed to the pool's panic handler.
  pub fn commit_task<F>(&self, task: F)
  where
    F: FnOnce() + Send + 'static, {
    self.shared.commit_task(Box::new(task));
  }

  /// Submits a task and returns a handle to its result.
  ///
  /// A panic inside `task` is delivered through the handle, not to the panic handler.
  pub fn commit<F, R>(&self, task: F) -> TaskHandle<R>
  where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static, {
    let (sender, receiver) = mpsc::sync_channel(1);
    self.shared.commit_task(Box::new(move || {
      if sender.send(TaskPanic::catch(task)).is_err() {
        trace!(target: LOG_TARGET, "task result dropped with its handle");
      }
    }));
    TaskHandle::new(receiver)
  }

  /// Returns whether the pool is running.
  #[must_use]
  pub fn is_running(&self) -> bool {
    self.shared.is_running()
  }

  /// Returns whether `thread_id` belongs to one of this pool's live workers.
  #[must_use]
  pub fn is_pool_thread(&self, thread_id: ThreadId) -> bool {
    self.shared.is_pool_thread(thread_id)
  }

  /// Number of live workers, core and temporary.
  #[must_use]
  pub fn worker_count(&self) -> usize {
    self.shared.worker_count()
  }

  /// Number of tasks waiting for a worker.
  #[must_use]
  pub fn queued_tasks(&self) -> usize {
    self.shared.queued_tasks()
  }

  /// Returns the current expansion threshold.
  #[must_use]
  pub fn task_block_queue_size(&self) -> usize {
    self.shared.task_block_queue_size()
  }

  /// Changes the expansion threshold.
  pub fn set_task_block_queue_size(&self, size: usize) {
    self.shared.set_task_block_queue_size(size);
  }

  /// Installs or clears the handler receiving panics of [`commit_task`](Self::commit_task) tasks.
  pub fn set_panic_handler(&self, handler: Option<PanicHandler>) {
    self.shared.panics().set_handler(handler);
  }
}

impl Drop for ThreadPool {
  fn drop(&mut self) {
    self.shared.stop();
  }
}
