#[cfg(test)]
mod tests;

/// Configuration for [`CallbackManager`](super::CallbackManager) and
/// [`NameCallbackManager`](super::NameCallbackManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallbackManagerConfig {
  max_callbacks:   usize,
  concurrent_call: bool,
}

impl CallbackManagerConfig {
  /// Unbounded registry with serialised invocation of each callable.
  #[must_use]
  pub const fn new() -> Self {
    Self { max_callbacks: 0, concurrent_call: false }
  }

  /// Sets the capacity; `0` is unbounded. The named registry applies it per name.
  #[must_use]
  pub const fn with_max_callbacks(mut self, max_callbacks: usize) -> Self {
    self.max_callbacks = max_callbacks;
    self
  }

  /// Allows the same callable to run on several threads at once.
  #[must_use]
  pub const fn with_concurrent_call(mut self, concurrent_call: bool) -> Self {
    self.concurrent_call = concurrent_call;
    self
  }

  /// Returns the capacity.
  #[must_use]
  pub const fn max_callbacks(&self) -> usize {
    self.max_callbacks
  }

  /// Returns whether concurrent invocation is enabled.
  #[must_use]
  pub const fn concurrent_call(&self) -> bool {
    self.concurrent_call
  }

  pub(crate) const fn is_full(&self, len: usize) -> bool {
    self.max_callbacks != 0 && len >= self.max_callbacks
  }
}

impl Default for CallbackManagerConfig {
  fn default() -> Self {
    Self::new()
  }
}
