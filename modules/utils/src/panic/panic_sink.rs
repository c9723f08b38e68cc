use std::fmt;

use parking_lot::RwLock;
use tracing::warn;

use super::{PanicHandler, TaskPanic};

#[cfg(test)]
mod tests;

/// Routes captured panics to an optional user supplied handler.
///
/// Without a handler the panic is logged and otherwise dropped; it never propagates out of the
/// worker that caught it.
#[derive(Default)]
pub struct PanicSink {
  handler: RwLock<Option<PanicHandler>>,
}

impl PanicSink {
  /// Target used for log events emitted when no handler is installed.
  pub const LOG_TARGET: &'static str = "fundament::panic";

  /// Creates a sink without a handler.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Installs or clears the handler.
  pub fn set_handler(&self, handler: Option<PanicHandler>) {
    *self.handler.write() = handler;
  }

  /// Returns the installed handler, if any.
  #[must_use]
  pub fn handler(&self) -> Option<PanicHandler> {
    self.handler.read().clone()
  }

  /// Delivers `panic` to the handler, or logs it when none is installed.
  pub fn report(&self, panic: &TaskPanic) {
    match self.handler() {
      | Some(handler) => handler(panic),
      | None => warn!(target: PanicSink::LOG_TARGET, panic = panic.message(), "panic swallowed at worker boundary"),
    }
  }
}

impl fmt::Debug for PanicSink {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PanicSink").field("has_handler", &self.handler.read().is_some()).finish()
  }
}
