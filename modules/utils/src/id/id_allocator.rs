use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(test)]
mod tests;

/// Allocator for strictly increasing, positive identifiers.
///
/// Identifiers are unique per allocator instance only; `0` is never issued so callers can use it
/// as a "no identifier" sentinel.
#[derive(Debug)]
pub struct IdAllocator {
  counter: AtomicU64,
}

impl IdAllocator {
  /// Creates an allocator whose first identifier is `1`.
  #[must_use]
  pub const fn new() -> Self {
    Self { counter: AtomicU64::new(1) }
  }

  /// Issues the next identifier.
  #[inline]
  pub fn allocate(&self) -> u64 {
    let issued = self.counter.fetch_add(1, Ordering::Relaxed);
    if issued == 0 { self.counter.fetch_add(1, Ordering::Relaxed) } else { issued }
  }

  /// Returns the identifier the next call to [`allocate`](Self::allocate) will issue.
  #[must_use]
  #[inline]
  pub fn peek(&self) -> u64 {
    self.counter.load(Ordering::Relaxed).max(1)
  }
}

impl Default for IdAllocator {
  fn default() -> Self {
    Self::new()
  }
}
