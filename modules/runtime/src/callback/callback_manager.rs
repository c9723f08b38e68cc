use std::{collections::BTreeSet, fmt};

use fundament_utils_rs::panic::{PanicHandler, PanicSink};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{CallbackId, CallbackManagerConfig, callback_entries::CallbackEntries, callback_node::fan_out};


pub(crate) const LOG_TARGET: &str = "fundament::callback";

/// Thread-safe registry fanning one argument out to every registered callable.
///
/// [`call`](Self::call) works on a snapshot taken under the registry lock, so callables may add or
/// remove registrations (without waiting on themselves) while being invoked.
///
/// # Examples
///
/// ```
/// use std::sync::{
///   Arc,
///   atomic::{AtomicUsize, Ordering},
/// };
///
/// use fundament_runtime_rs::callback::{CallbackManager, CallbackManagerConfig};
///
/// let manager = CallbackManager::new(CallbackManagerConfig::new());
/// let total = Arc::new(AtomicUsize::new(0));
/// let sink = total.clone();
/// let id = manager.add_callback(move |value: &usize| {
///   sink.fetch_add(*value, Ordering::SeqCst);
/// });
/// assert!(manager.call(&5));
/// assert!(manager.remove_callback(id, true));
/// assert!(!manager.call(&5));
/// assert_eq!(total.load(Ordering::SeqCst), 5);
/// ```
pub struct CallbackManager<A> {
  config:  CallbackManagerConfig,
  entries: Mutex<CallbackEntries<A>>,
  panics:  PanicSink,
}

impl<A> CallbackManager<A> {
  /// Creates an empty registry.
  #[must_use]
  pub fn new(config: CallbackManagerConfig) -> Self {
    Self { config, entries: Mutex::new(CallbackEntries::new()), panics: PanicSink::new() }
  }

  /// Returns the registry configuration.
  #[must_use]
  pub const fn config(&self) -> &CallbackManagerConfig {
    &self.config
  }

  /// Registers `callback`, returning [`CallbackId::INVALID`] when the registry is full.
  pub fn add_callback<F>(&self, callback: F) -> CallbackId
  where
    F: Fn(&A) + Send + Sync + 'static, {
    let mut entries = self.entries.lock();
    if self.config.is_full(entries.len()) {
      trace!(target: LOG_TARGET, max = self.config.max_callbacks(), "callback registration refused");
      return CallbackId::INVALID;
    }
    let id = entries.insert(Box::new(callback));
    trace!(target: LOG_TARGET, callback_id = id.raw(), "callback registered");
    id
  }

  /// Invokes every registered callable with `args`, in registration order.
  ///
  /// Returns `false` when nothing was registered.
  ///
  /// # Panics
  ///
  /// Resumes a callable's panic when no panic handler is installed.
  pub fn call(&self, args: &A) -> bool {
    let nodes = self.entries.lock().snapshot();
    if nodes.is_empty() {
      return false;
    }
    fan_out(&nodes, args, self.config.concurrent_call(), &self.panics);
    true
  }

  /// Unregisters a callable.
  ///
  /// With `wait`, blocks until no thread is running it and drops it before returning; it is never
  /// invoked afterwards. A callable must not remove itself with `wait`.
  pub fn remove_callback(&self, id: CallbackId, wait: bool) -> bool {
    let removed = self.entries.lock().remove(id);
    let Some(node) = removed else {
      return false;
    };
    node.release(wait);
    trace!(target: LOG_TARGET, callback_id = id.raw(), wait, "callback removed");
    true
  }

  /// Unregisters everything, returning how many callables were removed.
  pub fn clear(&self, wait: bool) -> usize {
    let drained = self.entries.lock().drain();
    drained.iter().for_each(|node| node.release(wait));
    debug!(target: LOG_TARGET, removed = drained.len(), "callback registry cleared");
    drained.len()
  }

  /// Returns `true` when nothing is registered.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.lock().is_empty()
  }

  /// Number of registered callables.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.lock().len()
  }

  /// Identifiers of the registered callables.
  #[must_use]
  pub fn callback_ids(&self) -> BTreeSet<CallbackId> {
    self.entries.lock().ids()
  }

  /// Installs or clears the handler receiving callable panics.
  pub fn set_panic_handler(&self, handler: Option<PanicHandler>) {
    self.panics.set_handler(handler);
  }
}

impl<A> Default for CallbackManager<A> {
  fn default() -> Self {
    Self::new(CallbackManagerConfig::new())
  }
}

impl<A> fmt::Debug for CallbackManager<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CallbackManager").field("config", &self.config).field("len", &self.len()).finish()
  }
}
