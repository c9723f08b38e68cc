use std::{collections::BTreeMap, sync::Arc};

use hashbrown::HashMap;

use super::{timer_task::TimerTask, timer_task_id::TimerTaskId};


struct IndexedTask<T> {
  task:        Arc<T>,
  queue_point: i64,
}

/// Dual index over scheduled tasks: by identifier and by `(deadline, id)`.
///
/// The deadline key records the value a task had when it was last (re)positioned, so a task whose
/// deadline changed must be passed to [`reposition`](Self::reposition) to keep both views consistent.
pub(crate) struct TaskIndex<T> {
  by_id:       HashMap<TimerTaskId, IndexedTask<T>>,
  by_deadline: BTreeMap<(i64, TimerTaskId), Arc<T>>,
}

impl<T: TimerTask> TaskIndex<T> {
  pub(crate) fn new() -> Self {
    Self { by_id: HashMap::new(), by_deadline: BTreeMap::new() }
  }

  pub(crate) fn insert(&mut self, task: Arc<T>) {
    let id = task.id();
    let queue_point = task.deadline();
    self.by_deadline.insert((queue_point, id), task.clone());
    if let Some(previous) = self.by_id.insert(id, IndexedTask { task, queue_point }) {
      self.by_deadline.remove(&(previous.queue_point, id));
    }
  }

  pub(crate) fn get(&self, id: TimerTaskId) -> Option<Arc<T>> {
    self.by_id.get(&id).map(|entry| entry.task.clone())
  }

  pub(crate) fn remove(&mut self, id: TimerTaskId) -> Option<Arc<T>> {
    let entry = self.by_id.remove(&id)?;
    self.by_deadline.remove(&(entry.queue_point, id));
    Some(entry.task)
  }

  /// Moves the task to the position matching its current deadline.
  pub(crate) fn reposition(&mut self, id: TimerTaskId) -> bool {
    let Some(entry) = self.by_id.get_mut(&id) else {
      return false;
    };
    let queue_point = entry.task.deadline();
    if queue_point != entry.queue_point {
      if let Some(task) = self.by_deadline.remove(&(entry.queue_point, id)) {
        self.by_deadline.insert((queue_point, id), task);
      }
      entry.queue_point = queue_point;
    }
    true
  }

  /// Task with the earliest deadline; ties resolve to the lower identifier.
  pub(crate) fn first(&self) -> Option<Arc<T>> {
    self.by_deadline.first_key_value().map(|(_, task)| task.clone())
  }

  /// Removes every task, returning them in deadline order.
  pub(crate) fn drain(&mut self) -> Vec<Arc<T>> {
    self.by_id.clear();
    std::mem::take(&mut self.by_deadline).into_values().collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.by_id.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.by_id.is_empty()
  }
}
