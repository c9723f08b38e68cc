use std::{sync::mpsc, time::Duration};

use fundament_utils_rs::panic::TaskPanic;

use super::TaskHandle;
use crate::thread_pool::TaskError;

#[test]
fn join_returns_the_value() {
  let (tx, rx) = mpsc::sync_channel(1);
  tx.send(Ok(5)).unwrap();
  assert_eq!(TaskHandle::new(rx).join(), Ok(5));
}

#[test]
fn join_reports_a_panic() {
  let (tx, rx) = mpsc::sync_channel::<Result<(), TaskPanic>>(1);
  tx.send(Err(TaskPanic::new("boom"))).unwrap();
  assert_eq!(TaskHandle::new(rx).join(), Err(TaskError::Panicked(TaskPanic::new("boom"))));
}

#[test]
fn dropped_sender_means_discarded() {
  let (tx, rx) = mpsc::sync_channel::<Result<u8, TaskPanic>>(1);
  drop(tx);
  assert_eq!(TaskHandle::new(rx).join(), Err(TaskError::Discarded));
}

#[test]
fn polling_is_non_blocking_until_the_outcome_arrives() {
  let (tx, rx) = mpsc::sync_channel(1);
  let handle = TaskHandle::new(rx);
  assert_eq!(handle.try_join(), None);
  assert_eq!(handle.join_timeout(Duration::from_millis(10)), None);
  tx.send(Ok("done")).unwrap();
  assert_eq!(handle.join_timeout(Duration::from_secs(1)), Some(Ok("done")));
  drop(tx);
  assert_eq!(handle.try_join(), Some(Err(TaskError::Discarded)));
}
