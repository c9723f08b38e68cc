use std::{collections::BTreeSet, sync::Arc, thread};

use super::IdAllocator;

#[test]
fn first_identifier_is_one() {
  let allocator = IdAllocator::new();
  assert_eq!(allocator.peek(), 1);
  assert_eq!(allocator.allocate(), 1);
  assert_eq!(allocator.allocate(), 2);
  assert_eq!(allocator.peek(), 3);
}

#[test]
fn concurrent_allocation_never_repeats() {
  let allocator = Arc::new(IdAllocator::new());
  let handles: Vec<_> = (0..8)
    .map(|_| {
      let allocator = allocator.clone();
      thread::spawn(move || (0..1_000).map(|_| allocator.allocate()).collect::<Vec<_>>())
    })
    .collect();

  let mut seen = BTreeSet::new();
  for handle in handles {
    for id in handle.join().unwrap() {
      assert!(id > 0);
      assert!(seen.insert(id), "duplicate id {id}");
    }
  }
  assert_eq!(seen.len(), 8_000);
}
