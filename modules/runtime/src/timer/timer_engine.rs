use std::{
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  thread::{self, JoinHandle, ThreadId},
  time::Duration,
};

use fundament_utils_rs::{
  id::IdAllocator,
  panic::{PanicHandler, PanicSink},
  sync::Event,
  thread::{spawn_named, worker_name},
};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, trace};

use super::{
  TimerConfig, task_index::TaskIndex, timer_clock::TimerClock, timer_task::TimerTask, timer_task_id::TimerTaskId,
};


const LOG_TARGET: &str = "fundament::timer";

const CONTROL_POLL: Duration = Duration::from_millis(1);

/// Deadline-ordered task queue serviced by a single worker thread.
///
/// The clock decides how ticks are measured and how long the worker sleeps; the task type decides
/// what a firing does. Dropping the engine stops it.
pub(crate) struct TimerEngine<C: TimerClock, T: TimerTask> {
  shared: Arc<EngineShared<C, T>>,
}

struct EngineShared<C, T> {
  clock:         C,
  config:        TimerConfig,
  index:         Mutex<TaskIndex<T>>,
  event:         Event,
  control:       Mutex<Option<JoinHandle<()>>>,
  running:       AtomicBool,
  worker_thread: Mutex<Option<ThreadId>>,
  ids:           IdAllocator,
  panics:        PanicSink,
}

impl<C: TimerClock, T: TimerTask> TimerEngine<C, T> {
  pub(crate) fn new(clock: C, config: TimerConfig) -> Self {
    Self {
      shared: Arc::new(EngineShared {
        clock,
        config,
        index: Mutex::new(TaskIndex::new()),
        event: Event::new(),
        control: Mutex::new(None),
        running: AtomicBool::new(false),
        worker_thread: Mutex::new(None),
        ids: IdAllocator::new(),
        panics: PanicSink::new(),
      }),
    }
  }

  pub(crate) fn clock(&self) -> &C {
    &self.shared.clock
  }

  pub(crate) fn next_id(&self) -> TimerTaskId {
    TimerTaskId::new(self.shared.ids.allocate())
  }

  /// Enqueues `task`, waking the worker; starts it in automatic mode.
  pub(crate) fn add_task(&self, task: T) -> TimerTaskId {
    let id = task.id();
    self.shared.index.lock().insert(Arc::new(task));
    trace!(target: LOG_TARGET, task_id = id.raw(), "timer task added");
    self.shared.event.notify();
    if self.shared.config.automatic() {
      self.start();
    }
    id
  }

  /// Applies `update` to a registered task and re-sorts it when the update succeeded.
  pub(crate) fn update_task(&self, id: TimerTaskId, update: impl FnOnce(&T) -> bool) -> bool {
    let Some(task) = self.shared.index.lock().get(id) else {
      return false;
    };
    if !update(&task) {
      return false;
    }
    self.shared.index.lock().reposition(id);
    self.shared.event.notify();
    true
  }

  /// Unlinks and disables a task.
  ///
  /// `wait` blocks until an in-flight callback has returned; on the worker thread it degrades to a
  /// non-waiting removal.
  pub(crate) fn remove_task(&self, id: TimerTaskId, wait: bool) -> bool {
    let removed = self.shared.index.lock().remove(id);
    let Some(task) = removed else {
      return false;
    };
    task.disable(wait && !self.shared.is_worker_thread());
    trace!(target: LOG_TARGET, task_id = id.raw(), wait, "timer task removed");
    true
  }

  /// Spawns the worker unless it is already running. Calling this from the worker is a no-op.
  pub(crate) fn start(&self) {
    let shared = &self.shared;
    if shared.is_worker_thread() {
      return;
    }
    let mut control = shared.control.lock();
    if shared.running.load(Ordering::Acquire) {
      return;
    }
    shared.event.reset();
    shared.running.store(true, Ordering::Release);
    let name = worker_name("timer", shared.config.thread_name(), "worker");
    let worker = Arc::clone(shared);
    match spawn_named(name.clone(), move || worker.run()) {
      | Ok(handle) => {
        *control = Some(handle);
        debug!(target: LOG_TARGET, thread = name.as_str(), "timer worker spawned");
      },
      | Err(spawn_error) => {
        shared.running.store(false, Ordering::Release);
        error!(target: LOG_TARGET, thread = name.as_str(), error = %spawn_error, "failed to spawn timer worker");
      },
    }
  }

  /// Stops the worker and discards every pending task.
  ///
  /// From a callback this returns at once when another thread is already stopping the timer.
  pub(crate) fn stop(&self) {
    let shared = &self.shared;
    let on_worker = shared.is_worker_thread();
    {
      let mut control = if on_worker {
        match shared.lock_control_from_worker() {
          | Some(control) => control,
          | None => return,
        }
      } else {
        shared.control.lock()
      };
      shared.running.store(false, Ordering::Release);
      shared.event.notify();
      if let Some(handle) = control.take() {
        if on_worker {
          drop(handle);
        } else if handle.join().is_err() {
          error!(target: LOG_TARGET, "timer worker terminated by panic");
        }
      }
    }
    let drained = shared.index.lock().drain();
    let discarded = drained.len();
    for task in drained {
      task.disable(!on_worker);
    }
    debug!(target: LOG_TARGET, discarded, "timer stopped");
  }

  pub(crate) fn is_running(&self) -> bool {
    self.shared.running.load(Ordering::Acquire)
  }

  pub(crate) fn len(&self) -> usize {
    self.shared.index.lock().len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.shared.index.lock().is_empty()
  }

  pub(crate) fn set_panic_handler(&self, handler: Option<PanicHandler>) {
    self.shared.panics.set_handler(handler);
  }
}

impl<C: TimerClock, T: TimerTask> Drop for TimerEngine<C, T> {
  fn drop(&mut self) {
    self.stop();
  }
}

impl<C: TimerClock, T: TimerTask> EngineShared<C, T> {
  fn is_worker_thread(&self) -> bool {
    *self.worker_thread.lock() == Some(thread::current().id())
  }

  /// Takes `control` on the worker, giving up once the timer stops running.
  ///
  /// A concurrent `stop` holds `control` while it joins the worker.
  fn lock_control_from_worker(&self) -> Option<MutexGuard<'_, Option<JoinHandle<()>>>> {
    loop {
      if let Some(control) = self.control.try_lock_for(CONTROL_POLL) {
        return Some(control);
      }
      if !self.running.load(Ordering::Acquire) {
        return None;
      }
    }
  }

  fn run(&self) {
    let thread_id = thread::current().id();
    *self.worker_thread.lock() = Some(thread_id);
    while self.running.load(Ordering::Acquire) {
      let head = self.index.lock().first();
      let Some(task) = head else {
        if self.retire_when_idle() {
          debug!(target: LOG_TARGET, "idle timer worker retired");
          return;
        }
        continue;
      };
      let now = self.clock.now();
      let deadline = task.deadline();
      if now >= deadline {
        self.fire(&task, now);
      } else {
        drop(task);
        self.event.wait_timeout(self.clock.wait_step(now, deadline));
      }
    }
    let mut worker_thread = self.worker_thread.lock();
    if *worker_thread == Some(thread_id) {
      *worker_thread = None;
    }
  }

  fn fire(&self, task: &Arc<T>, now: i64) {
    let id = task.id();
    trace!(target: LOG_TARGET, task_id = id.raw(), "timer task firing");
    if task.emit(now, &self.clock, &self.panics) {
      self.index.lock().reposition(id);
    } else {
      let finished = self.index.lock().remove(id);
      drop(finished);
    }
  }

  /// Waits for work; in automatic mode retires the worker when the queue stayed empty.
  ///
  /// Returns `true` when the worker has detached itself and must exit.
  fn retire_when_idle(&self) -> bool {
    let signaled = self.event.wait_timeout(self.config.idle_timeout());
    if signaled || !self.config.automatic() {
      return false;
    }
    let Some(mut control) = self.control.try_lock() else {
      return false;
    };
    if !self.running.load(Ordering::Acquire) || !self.index.lock().is_empty() {
      return false;
    }
    self.running.store(false, Ordering::Release);
    drop(control.take());
    *self.worker_thread.lock() = None;
    true
  }
}
