use std::{borrow::Borrow, collections::BTreeSet, fmt, hash::Hash, sync::Arc};

use fundament_utils_rs::panic::{PanicHandler, PanicSink};
use hashbrown::HashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{
  CallbackId, CallbackManagerConfig,
  callback_entries::CallbackEntries,
  callback_manager::LOG_TARGET,
  callback_node::{CallbackNode, fan_out},
};


struct NamedEntries<N, A> {
  entries: CallbackEntries<A>,
  groups:  HashMap<N, Vec<CallbackId>>,
  names:   HashMap<CallbackId, N>,
}

impl<N: Eq + Hash, A> NamedEntries<N, A> {
  fn unlink(&mut self, id: CallbackId) -> Option<Arc<CallbackNode<A>>> {
    let node = self.entries.remove(id)?;
    if let Some(name) = self.names.remove(&id) {
      if let Some(group) = self.groups.get_mut(&name) {
        group.retain(|member| *member != id);
        if group.is_empty() {
          self.groups.remove(&name);
        }
      }
    }
    Some(node)
  }
}

/// Callback registry whose callables are grouped by name.
///
/// Identifiers are shared across groups and never reused. The capacity configured through
/// [`CallbackManagerConfig::with_max_callbacks`] bounds each name separately. Calls fan out over a
/// snapshot of the group taken under the registry lock; registrations racing with a call may or may
/// not be observed by it.
pub struct NameCallbackManager<N, A> {
  config: CallbackManagerConfig,
  state:  Mutex<NamedEntries<N, A>>,
  panics: PanicSink,
}

impl<N, A> NameCallbackManager<N, A>
where
  N: Eq + Hash + Clone,
{
  /// Creates an empty registry.
  #[must_use]
  pub fn new(config: CallbackManagerConfig) -> Self {
    Self {
      config,
      state: Mutex::new(NamedEntries {
        entries: CallbackEntries::new(),
        groups:  HashMap::new(),
        names:   HashMap::new(),
      }),
      panics: PanicSink::new(),
    }
  }

  /// Returns the registry configuration.
  #[must_use]
  pub const fn config(&self) -> &CallbackManagerConfig {
    &self.config
  }

  /// Registers `callback` under `name`, returning [`CallbackId::INVALID`] when that name is full.
  pub fn add_callback<F>(&self, name: N, callback: F) -> CallbackId
  where
    F: Fn(&A) + Send + Sync + 'static, {
    let mut state = self.state.lock();
    let members = state.groups.get(&name).map_or(0, Vec::len);
    if self.config.is_full(members) {
      trace!(target: LOG_TARGET, max = self.config.max_callbacks(), "named callback registration refused");
      return CallbackId::INVALID;
    }
    let id = state.entries.insert(Box::new(callback));
    state.groups.entry(name.clone()).or_default().push(id);
    state.names.insert(id, name);
    trace!(target: LOG_TARGET, callback_id = id.raw(), "named callback registered");
    id
  }

  /// Invokes every callable registered under `name`, in registration order.
  ///
  /// Returns `false` when the group is absent.
  ///
  /// # Panics
  ///
  /// Resumes a callable's panic when no panic handler is installed.
  pub fn call<Q>(&self, name: &Q, args: &A) -> bool
  where
    N: Borrow<Q>,
    Q: Eq + Hash + ?Sized, {
    let nodes = {
      let state = self.state.lock();
      match state.groups.get(name) {
        | Some(group) => state.entries.snapshot_of(group),
        | None => Vec::new(),
      }
    };
    if nodes.is_empty() {
      return false;
    }
    fan_out(&nodes, args, self.config.concurrent_call(), &self.panics);
    true
  }

  /// Unregisters one callable; see [`CallbackManager::remove_callback`](super::CallbackManager::remove_callback)
  /// for the meaning of `wait`.
  pub fn remove_callback(&self, id: CallbackId, wait: bool) -> bool {
    let removed = self.state.lock().unlink(id);
    let Some(node) = removed else {
      return false;
    };
    node.release(wait);
    trace!(target: LOG_TARGET, callback_id = id.raw(), wait, "named callback removed");
    true
  }

  /// Unregisters the whole group registered under `name`.
  pub fn remove_named<Q>(&self, name: &Q, wait: bool) -> bool
  where
    N: Borrow<Q>,
    Q: Eq + Hash + ?Sized, {
    let removed: Vec<Arc<CallbackNode<A>>> = {
      let mut state = self.state.lock();
      let Some(group) = state.groups.remove(name) else {
        return false;
      };
      group
        .into_iter()
        .filter_map(|id| {
          state.names.remove(&id);
          state.entries.remove(id)
        })
        .collect()
    };
    removed.iter().for_each(|node| node.release(wait));
    trace!(target: LOG_TARGET, removed = removed.len(), wait, "callback group removed");
    true
  }

  /// Unregisters everything, returning how many callables were removed.
  pub fn clear(&self, wait: bool) -> usize {
    let drained = {
      let mut state = self.state.lock();
      state.groups.clear();
      state.names.clear();
      state.entries.drain()
    };
    drained.iter().for_each(|node| node.release(wait));
    debug!(target: LOG_TARGET, removed = drained.len(), "named callback registry cleared");
    drained.len()
  }

  /// Returns `true` when nothing is registered.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.state.lock().entries.is_empty()
  }

  /// Number of registered callables across all names.
  #[must_use]
  pub fn len(&self) -> usize {
    self.state.lock().entries.len()
  }

  /// Identifiers of every registered callable.
  #[must_use]
  pub fn callback_ids(&self) -> BTreeSet<CallbackId> {
    self.state.lock().entries.ids()
  }

  /// Returns `true` when nothing is registered under `name`.
  #[must_use]
  pub fn is_empty_named<Q>(&self, name: &Q) -> bool
  where
    N: Borrow<Q>,
    Q: Eq + Hash + ?Sized, {
    self.len_named(name) == 0
  }

  /// Number of callables registered under `name`.
  #[must_use]
  pub fn len_named<Q>(&self, name: &Q) -> usize
  where
    N: Borrow<Q>,
    Q: Eq + Hash + ?Sized, {
    self.state.lock().groups.get(name).map_or(0, Vec::len)
  }

  /// Identifiers registered under `name`.
  #[must_use]
  pub fn callback_ids_named<Q>(&self, name: &Q) -> BTreeSet<CallbackId>
  where
    N: Borrow<Q>,
    Q: Eq + Hash + ?Sized, {
    self.state.lock().groups.get(name).map(|group| group.iter().copied().collect()).unwrap_or_default()
  }

  /// Installs or clears the handler receiving callable panics.
  pub fn set_panic_handler(&self, handler: Option<PanicHandler>) {
    self.panics.set_handler(handler);
  }
}

impl<N, A> Default for NameCallbackManager<N, A>
where
  N: Eq + Hash + Clone,
{
  fn default() -> Self {
    Self::new(CallbackManagerConfig::new())
  }
}

impl<N, A> fmt::Debug for NameCallbackManager<N, A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.lock();
    f.debug_struct("NameCallbackManager")
      .field("config", &self.config)
      .field("len", &state.entries.len())
      .field("groups", &state.groups.len())
      .finish()
  }
}
