//! Timer error types returned by public APIs.

use std::{error::Error, fmt};

#[cfg(test)]
mod tests;

/// Errors raised when a timer task cannot be registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerError {
  /// Period was zero or exceeded the representable tick range.
  InvalidPeriod,
  /// Wall-clock target does not exist locally or is outside the representable tick range.
  InvalidTarget,
}

impl fmt::Display for TimerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::InvalidPeriod => write!(f, "invalid timer period"),
      | Self::InvalidTarget => write!(f, "invalid timer target"),
    }
  }
}

impl Error for TimerError {}
