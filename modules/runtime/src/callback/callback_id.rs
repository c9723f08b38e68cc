use std::fmt;


/// Identifier of a registered callback.
///
/// Valid identifiers are positive and strictly increasing per registry; [`CallbackId::INVALID`] is
/// returned when a registration is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackId(u64);

impl CallbackId {
  /// Identifier signalling a refused registration.
  pub const INVALID: Self = Self(0);

  /// Creates an identifier from its raw value.
  #[must_use]
  pub const fn new(raw: u64) -> Self {
    Self(raw)
  }

  /// Returns the raw identifier.
  #[must_use]
  pub const fn raw(&self) -> u64 {
    self.0
  }

  /// Returns `false` for [`CallbackId::INVALID`].
  #[must_use]
  pub const fn is_valid(&self) -> bool {
    self.0 != 0
  }
}

impl fmt::Display for CallbackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "callback-{}", self.0)
  }
}
