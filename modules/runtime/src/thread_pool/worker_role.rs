/// Lifetime class of a pool worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WorkerRole {
  /// Lives until the pool stops; waits for work without a timeout.
  Core,
  /// Spawned by expansion; retires after the idle timeout once the queue is empty.
  Temporary,
}

impl WorkerRole {
  pub(crate) const fn label(self) -> &'static str {
    match self {
      | Self::Core => "core",
      | Self::Temporary => "temp",
    }
  }
}
