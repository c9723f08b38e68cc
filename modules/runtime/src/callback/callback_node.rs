use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
  sync::Arc,
};

use fundament_utils_rs::panic::{PanicSink, TaskPanic};
use parking_lot::RwLock;

use super::{Callback, CallbackId};

/// Registered callable behind its own lock.
///
/// Invocation takes the lock exclusively (serialised mode) or shared (concurrent mode); a waiting
/// release takes it exclusively, so it returns only once no invocation is in flight.
pub(crate) struct CallbackNode<A> {
  id:       CallbackId,
  callback: RwLock<Option<Callback<A>>>,
}

impl<A> CallbackNode<A> {
  pub(crate) fn new(id: CallbackId, callback: Callback<A>) -> Self {
    Self { id, callback: RwLock::new(Some(callback)) }
  }

  pub(crate) const fn id(&self) -> CallbackId {
    self.id
  }

  /// Runs the callable unless it was released. The lock is dropped before the payload is returned.
  fn invoke(&self, args: &A, concurrent: bool) -> Result<(), Box<dyn Any + Send>> {
    let run = |callback: Option<&Callback<A>>| match callback {
      | Some(callback) => panic::catch_unwind(AssertUnwindSafe(|| callback(args))),
      | None => Ok(()),
    };
    if concurrent { run(self.callback.read().as_ref()) } else { run(self.callback.write().as_ref()) }
  }

  /// Drops the callable. With `wait`, blocks until in-flight invocations have returned.
  pub(crate) fn release(&self, wait: bool) {
    if wait {
      *self.callback.write() = None;
    } else if let Some(mut callback) = self.callback.try_write() {
      *callback = None;
    }
  }
}

/// Invokes every node in order.
///
/// A panic is handed to the installed handler and the fan-out continues; without a handler the panic
/// resumes on the calling thread.
pub(crate) fn fan_out<A>(nodes: &[Arc<CallbackNode<A>>], args: &A, concurrent: bool, panics: &PanicSink) {
  for node in nodes {
    if let Err(payload) = node.invoke(args, concurrent) {
      match panics.handler() {
        | Some(handler) => handler(&TaskPanic::from_payload(payload.as_ref())),
        | None => panic::resume_unwind(payload),
      }
    }
  }
}
