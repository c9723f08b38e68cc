use std::{
  collections::{BTreeMap, BTreeSet},
  sync::Arc,
};

use fundament_utils_rs::id::IdAllocator;

use super::{Callback, CallbackId, callback_node::CallbackNode};


/// Registered nodes keyed by id; iteration order is registration order.
pub(crate) struct CallbackEntries<A> {
  nodes: BTreeMap<CallbackId, Arc<CallbackNode<A>>>,
  ids:   IdAllocator,
}

impl<A> CallbackEntries<A> {
  pub(crate) fn new() -> Self {
    Self { nodes: BTreeMap::new(), ids: IdAllocator::new() }
  }

  pub(crate) fn insert(&mut self, callback: Callback<A>) -> CallbackId {
    let id = CallbackId::new(self.ids.allocate());
    self.nodes.insert(id, Arc::new(CallbackNode::new(id, callback)));
    id
  }

  pub(crate) fn remove(&mut self, id: CallbackId) -> Option<Arc<CallbackNode<A>>> {
    self.nodes.remove(&id)
  }

  pub(crate) fn snapshot(&self) -> Vec<Arc<CallbackNode<A>>> {
    self.nodes.values().cloned().collect()
  }

  pub(crate) fn snapshot_of(&self, ids: &[CallbackId]) -> Vec<Arc<CallbackNode<A>>> {
    ids.iter().filter_map(|id| self.nodes.get(id).cloned()).collect()
  }

  pub(crate) fn drain(&mut self) -> Vec<Arc<CallbackNode<A>>> {
    std::mem::take(&mut self.nodes).into_values().collect()
  }

  pub(crate) fn ids(&self) -> BTreeSet<CallbackId> {
    self.nodes.keys().copied().collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.nodes.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}
