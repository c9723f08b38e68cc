use std::{
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use fundament_utils_rs::panic::PanicSink;

use super::AbsoluteTimerTask;
use crate::timer::{timer_clock::TimerClock, timer_task::TimerTask, timer_task_id::TimerTaskId};

struct IdleClock;

impl TimerClock for IdleClock {
  fn now(&self) -> i64 {
    0
  }

  fn wait_step(&self, _now: i64, _deadline: i64) -> Duration {
    Duration::ZERO
  }
}

fn counting_task(calls: &Arc<AtomicUsize>) -> AbsoluteTimerTask {
  let calls = calls.clone();
  AbsoluteTimerTask::new(
    TimerTaskId::new(1),
    500,
    Box::new(move || {
      calls.fetch_add(1, Ordering::SeqCst);
    }),
  )
}

#[test]
fn fires_exactly_once() {
  let calls = Arc::new(AtomicUsize::new(0));
  let task = counting_task(&calls);
  assert!(!task.emit(500, &IdleClock, &PanicSink::new()));
  assert!(!task.emit(600, &IdleClock, &PanicSink::new()));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn target_updates_until_fired() {
  let calls = Arc::new(AtomicUsize::new(0));
  let task = counting_task(&calls);
  assert!(task.update_target(900));
  assert_eq!(task.deadline(), 900);
  task.emit(900, &IdleClock, &PanicSink::new());
  assert!(!task.update_target(1_200));
}

#[test]
fn disabled_task_drops_its_callback_without_running_it() {
  let calls = Arc::new(AtomicUsize::new(0));
  let task = counting_task(&calls);
  task.disable(true);
  assert_eq!(Arc::strong_count(&calls), 1);
  assert!(!task.emit(500, &IdleClock, &PanicSink::new()));
  assert_eq!(calls.load(Ordering::SeqCst), 0);
}
