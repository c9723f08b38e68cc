use std::{error::Error, fmt};

use fundament_utils_rs::panic::TaskPanic;


/// Failure observed through a [`TaskHandle`](super::TaskHandle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskError {
  /// The task panicked; the panic was captured for the handle instead of the pool's handler.
  Panicked(TaskPanic),
  /// The pool stopped before the task ran.
  Discarded,
}

impl fmt::Display for TaskError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Panicked(panic) => write!(f, "{panic}"),
      | Self::Discarded => write!(f, "task discarded before it ran"),
    }
  }
}

impl Error for TaskError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      | Self::Panicked(panic) => Some(panic),
      | Self::Discarded => None,
    }
  }
}
