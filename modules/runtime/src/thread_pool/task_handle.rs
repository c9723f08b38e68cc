use std::{
  sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError},
  time::Duration,
};

use fundament_utils_rs::panic::TaskPanic;

use super::TaskError;

#[cfg(test)]
mod tests;

/// Receiving side of a task submitted with [`ThreadPool::commit`](super::ThreadPool::commit).
///
/// The outcome can be taken once; after a successful poll further polls report
/// [`TaskError::Discarded`].
#[derive(Debug)]
pub struct TaskHandle<R> {
  receiver: Receiver<Result<R, TaskPanic>>,
}

impl<R> TaskHandle<R> {
  pub(crate) const fn new(receiver: Receiver<Result<R, TaskPanic>>) -> Self {
    Self { receiver }
  }

  /// Blocks until the task finished or was discarded.
  ///
  /// # Errors
  ///
  /// Returns [`TaskError::Panicked`] when the task panicked and [`TaskError::Discarded`] when the pool
  /// dropped it unrun.
  pub fn join(self) -> Result<R, TaskError> {
    match self.receiver.recv() {
      | Ok(outcome) => outcome.map_err(TaskError::Panicked),
      | Err(_) => Err(TaskError::Discarded),
    }
  }

  /// Returns the outcome if the task already finished, `None` while it is pending.
  pub fn try_join(&self) -> Option<Result<R, TaskError>> {
    match self.receiver.try_recv() {
      | Ok(outcome) => Some(outcome.map_err(TaskError::Panicked)),
      | Err(TryRecvError::Empty) => None,
      | Err(TryRecvError::Disconnected) => Some(Err(TaskError::Discarded)),
    }
  }

  /// Waits up to `timeout` for the outcome, `None` when it is still pending.
  pub fn join_timeout(&self, timeout: Duration) -> Option<Result<R, TaskError>> {
    match self.receiver.recv_timeout(timeout) {
      | Ok(outcome) => Some(outcome.map_err(TaskError::Panicked)),
      | Err(RecvTimeoutError::Timeout) => None,
      | Err(RecvTimeoutError::Disconnected) => Some(Err(TaskError::Discarded)),
    }
  }
}
