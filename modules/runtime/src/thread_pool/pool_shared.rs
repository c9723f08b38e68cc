use std::{
  collections::VecDeque,
  sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  thread::{self, JoinHandle, ThreadId},
  time::Duration,
};

use fundament_utils_rs::{
  panic::{PanicSink, TaskPanic},
  sync::Event,
  thread::{spawn_named, worker_name},
};
use hashbrown::HashSet;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, trace};

use super::{ThreadPoolConfig, worker_role::WorkerRole};

pub(crate) const LOG_TARGET: &str = "fundament::thread_pool";

const CONTROL_POLL: Duration = Duration::from_millis(1);

/// Unit of work queued on the pool.
pub(crate) type PoolJob = Box<dyn FnOnce() + Send + 'static>;

struct PoolWorker {
  thread_id: ThreadId,
  role:      WorkerRole,
  handle:    JoinHandle<()>,
}

/// State shared between a [`ThreadPool`](super::ThreadPool) handle and its workers.
///
/// The queue, the worker roster and the pool-thread set are locked independently. Decisions that
/// change the roster (start, stop, expansion, retirement) are serialised by `control`.
pub(crate) struct PoolShared {
  config:                ThreadPoolConfig,
  task_block_queue_size: AtomicUsize,
  tasks:                 Mutex<VecDeque<PoolJob>>,
  workers:               Mutex<Vec<PoolWorker>>,
  worker_count:          AtomicUsize,
  thread_ids:            Mutex<HashSet<ThreadId>>,
  control:               Mutex<()>,
  running:               AtomicBool,
  event:                 Event,
  panics:                PanicSink,
}

impl PoolShared {
  pub(crate) fn new(config: ThreadPoolConfig) -> Self {
    Self {
      task_block_queue_size: AtomicUsize::new(config.task_block_queue_size()),
      config,
      tasks: Mutex::new(VecDeque::new()),
      workers: Mutex::new(Vec::new()),
      worker_count: AtomicUsize::new(0),
      thread_ids: Mutex::new(HashSet::new()),
      control: Mutex::new(()),
      running: AtomicBool::new(false),
      event: Event::new(),
      panics: PanicSink::new(),
    }
  }

  pub(crate) const fn config(&self) -> &ThreadPoolConfig {
    &self.config
  }

  pub(crate) const fn panics(&self) -> &PanicSink {
    &self.panics
  }

  pub(crate) fn is_running(&self) -> bool {
    self.running.load(Ordering::Acquire)
  }

  pub(crate) fn worker_count(&self) -> usize {
    self.worker_count.load(Ordering::SeqCst)
  }

  pub(crate) fn queued_tasks(&self) -> usize {
    self.tasks.lock().len()
  }

  pub(crate) fn task_block_queue_size(&self) -> usize {
    self.task_block_queue_size.load(Ordering::Acquire)
  }

  pub(crate) fn set_task_block_queue_size(&self, size: usize) {
    self.task_block_queue_size.store(size, Ordering::Release);
  }

  pub(crate) fn is_pool_thread(&self, thread_id: ThreadId) -> bool {
    self.thread_ids.lock().contains(&thread_id)
  }

  fn on_pool_thread(&self) -> bool {
    self.is_pool_thread(thread::current().id())
  }

  /// Spawns the core workers. No-op when running or called from a pool thread.
  pub(crate) fn start(self: &Arc<Self>) {
    if self.on_pool_thread() {
      return;
    }
    let control = self.control.lock();
    if self.running.load(Ordering::Acquire) {
      return;
    }
    self.event.reset();
    self.running.store(true, Ordering::Release);
    for _ in 0..self.config.core_size() {
      self.spawn_worker(WorkerRole::Core, &control);
    }
    debug!(target: LOG_TARGET, workers = self.worker_count(), "thread pool started");
  }

  /// Stops every worker and discards the queue.
  ///
  /// Workers finish the task they are running; queued tasks are dropped unrun. Called from a pool
  /// thread, that thread is detached instead of joined, and the call returns at once when another
  /// thread is already stopping the pool.
  pub(crate) fn stop(&self) {
    let current = thread::current().id();
    {
      let _control = if self.on_pool_thread() {
        match self.lock_control_from_worker() {
          | Some(control) => control,
          | None => return,
        }
      } else {
        self.control.lock()
      };
      self.running.store(false, Ordering::Release);
      self.event.notify_all();
      let workers = std::mem::take(&mut *self.workers.lock());
      for worker in workers {
        if worker.thread_id == current {
          drop(worker.handle);
        } else if worker.handle.join().is_err() {
          error!(target: LOG_TARGET, role = worker.role.label(), "pool worker terminated by panic");
        }
      }
      self.worker_count.store(0, Ordering::Release);
      self.event.reset();
    }
    let discarded: Vec<PoolJob> = self.tasks.lock().drain(..).collect();
    debug!(target: LOG_TARGET, discarded = discarded.len(), "thread pool stopped");
    drop(discarded);
  }

  /// Takes `control` on a pool thread, giving up once the pool stops running.
  ///
  /// A concurrent `stop` holds `control` while it joins this thread.
  fn lock_control_from_worker(&self) -> Option<MutexGuard<'_, ()>> {
    loop {
      if let Some(control) = self.control.try_lock_for(CONTROL_POLL) {
        return Some(control);
      }
      if !self.is_running() {
        return None;
      }
    }
  }

  /// Queues a task, starting or expanding the pool as configured.
  pub(crate) fn commit_task(self: &Arc<Self>, job: PoolJob) {
    self.tasks.lock().push_back(job);
    self.event.notify();
    if self.on_pool_thread() {
      return;
    }
    if !self.is_running() && self.config.automatic() {
      self.start();
    }
    if self.config.auto_expansion() {
      self.try_expand();
    }
  }

  fn try_expand(self: &Arc<Self>) {
    let control = match self.control.try_lock() {
      | Some(control) => control,
      | None if self.worker_count() == 0 => self.control.lock(),
      | None => return,
    };
    if !self.is_running() {
      return;
    }
    let workers = self.worker_count();
    if workers >= self.config.max_size() {
      return;
    }
    let queued = self.queued_tasks();
    if (workers == 0 || queued > self.task_block_queue_size()) && self.spawn_worker(WorkerRole::Temporary, &control) {
      trace!(target: LOG_TARGET, queued, workers = workers + 1, "thread pool expanded");
    }
  }

  fn spawn_worker(self: &Arc<Self>, role: WorkerRole, _control: &MutexGuard<'_, ()>) -> bool {
    let name = worker_name("tp", self.config.thread_name(), role.label());
    let shared = Arc::clone(self);
    match spawn_named(name.clone(), move || shared.run_worker(role)) {
      | Ok(handle) => {
        let thread_id = handle.thread().id();
        self.workers.lock().push(PoolWorker { thread_id, role, handle });
        self.worker_count.fetch_add(1, Ordering::AcqRel);
        true
      },
      | Err(spawn_error) => {
        error!(target: LOG_TARGET, thread = name.as_str(), error = %spawn_error, "failed to spawn pool worker");
        false
      },
    }
  }

  fn run_worker(&self, role: WorkerRole) {
    let thread_id = thread::current().id();
    // Registered before the first pop so a task never runs on an unknown pool thread.
    self.thread_ids.lock().insert(thread_id);
    debug!(target: LOG_TARGET, role = role.label(), "pool worker started");
    while self.is_running() {
      if let Some(job) = self.pop_task() {
        self.execute(job);
        continue;
      }
      match role {
        | WorkerRole::Core => self.event.wait(),
        | WorkerRole::Temporary => {
          if !self.event.wait_timeout(self.config.temp_worker_idle_timeout()) && self.try_retire(thread_id) {
            debug!(target: LOG_TARGET, "temporary pool worker retired");
            return;
          }
        },
      }
    }
    self.thread_ids.lock().remove(&thread_id);
    debug!(target: LOG_TARGET, role = role.label(), "pool worker exited");
  }

  fn pop_task(&self) -> Option<PoolJob> {
    let mut tasks = self.tasks.lock();
    let job = tasks.pop_front();
    if job.is_some() && !tasks.is_empty() {
      self.event.notify();
    }
    job
  }

  fn execute(&self, job: PoolJob) {
    if let Err(panic) = TaskPanic::catch(job) {
      self.panics.report(&panic);
    }
  }

  /// Leaves the roster when the queue is still empty under the control lock.
  ///
  /// The count drops before the queue check, so a submitter that pushes after the check sees zero
  /// workers and takes the blocking expansion path.
  fn try_retire(&self, thread_id: ThreadId) -> bool {
    let Some(_control) = self.control.try_lock() else {
      return false;
    };
    if !self.is_running() {
      return false;
    }
    self.worker_count.fetch_sub(1, Ordering::SeqCst);
    if !self.tasks.lock().is_empty() {
      self.worker_count.fetch_add(1, Ordering::SeqCst);
      return false;
    }
    let mut workers = self.workers.lock();
    if let Some(position) = workers.iter().position(|worker| worker.thread_id == thread_id) {
      drop(workers.swap_remove(position).handle);
    }
    drop(workers);
    self.thread_ids.lock().remove(&thread_id);
    true
  }
}
