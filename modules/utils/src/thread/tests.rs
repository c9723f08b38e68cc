use std::thread;

use super::{spawn_named, worker_name};

#[test]
fn spawned_thread_carries_its_name() {
  let handle = spawn_named("named-worker".to_owned(), || {
    assert_eq!(thread::current().name(), Some("named-worker"));
  })
  .unwrap();
  handle.join().unwrap();
}

#[test]
fn worker_name_includes_label_when_present() {
  assert_eq!(worker_name("tp", Some("io"), "core"), "tp[io]-core");
  assert_eq!(worker_name("tp", None, "temp"), "tp-temp");
  assert_eq!(worker_name("timer", Some(""), "worker"), "timer-worker");
}
