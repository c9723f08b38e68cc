use std::{
  any::Any,
  error::Error,
  fmt,
  panic::{self, AssertUnwindSafe},
};


/// Panic captured at a worker boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskPanic {
  message: String,
}

impl TaskPanic {
  /// Message used when the payload is neither `&str` nor `String`.
  pub const NON_STRING_PAYLOAD: &'static str = "<non-string panic payload>";

  /// Creates a panic record with an explicit message.
  #[must_use]
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }

  /// Extracts the message carried by a panic payload.
  #[must_use]
  pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
      Self::new(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
      Self::new(message.clone())
    } else {
      Self::new(Self::NON_STRING_PAYLOAD)
    }
  }

  /// Runs `f`, converting an unwinding panic into a [`TaskPanic`].
  ///
  /// # Errors
  ///
  /// Returns the captured panic when `f` unwinds.
  pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, Self> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Self::from_payload(payload.as_ref()))
  }

  /// Returns the panic message.
  #[must_use]
  pub fn message(&self) -> &str {
    &self.message
  }
}

impl fmt::Display for TaskPanic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "task panicked: {}", self.message)
  }
}

impl Error for TaskPanic {}
