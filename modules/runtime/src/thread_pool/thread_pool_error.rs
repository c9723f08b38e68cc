//! Errors raised when a thread pool configuration is rejected.

use std::{error::Error, fmt};

#[cfg(test)]
mod tests;

/// Invalid [`ThreadPoolConfig`](super::ThreadPoolConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadPoolError {
  /// No core workers and no expansion: submitted tasks could never run.
  NoWorkers,
  /// `max_size` is zero or below `core_size`.
  InvalidMaxSize {
    /// Configured core size.
    core_size: usize,
    /// Configured maximum size.
    max_size:  usize,
  },
}

impl fmt::Display for ThreadPoolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::NoWorkers => write!(f, "thread pool has no core workers and auto expansion is disabled"),
      | Self::InvalidMaxSize { core_size, max_size } => {
        write!(f, "thread pool max size {max_size} is invalid for core size {core_size}")
      },
    }
  }
}

impl Error for ThreadPoolError {}
