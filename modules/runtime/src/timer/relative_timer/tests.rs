use std::{
  sync::{
    Arc, Weak,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    mpsc,
  },
  thread,
  time::{Duration, Instant},
};

use fundament_utils_rs::{
  panic::{PanicHandler, TaskPanic},
  sync::CountDownLatch,
};
use parking_lot::Mutex;

use super::RelativeTimer;
use crate::timer::{TimerConfig, TimerError, TimerTaskId};

const PATIENCE: Duration = Duration::from_secs(5);

fn wait_for(condition: impl Fn() -> bool) -> bool {
  let deadline = Instant::now() + PATIENCE;
  while Instant::now() < deadline {
    if condition() {
      return true;
    }
    thread::sleep(Duration::from_millis(5));
  }
  condition()
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
  fn drop(&mut self) {
    self.0.store(true, Ordering::SeqCst);
  }
}

#[test]
fn delay_task_fires_once_after_its_delay() {
  let timer = RelativeTimer::default();
  let (tx, rx) = mpsc::channel();
  let started = Instant::now();
  let id = timer.add_delay_task(move || tx.send(Instant::now()).unwrap(), Duration::from_millis(100)).unwrap();

  let fired_at = rx.recv_timeout(PATIENCE).unwrap();
  assert!(fired_at.duration_since(started) >= Duration::from_millis(95));
  assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
  assert!(wait_for(|| timer.is_empty()));
  assert!(!timer.remove_task(id, true));
}

#[test]
fn zero_delay_fires_promptly() {
  let timer = RelativeTimer::default();
  let (tx, rx) = mpsc::channel();
  timer.add_delay_task(move || tx.send(()).unwrap(), Duration::ZERO).unwrap();
  assert!(rx.recv_timeout(PATIENCE).is_ok());
}

#[test]
fn removed_delay_task_never_fires() {
  let timer = RelativeTimer::default();
  let fired = Arc::new(AtomicBool::new(false));
  let flag = fired.clone();
  let id = timer.add_delay_task(move || flag.store(true, Ordering::SeqCst), Duration::from_millis(100)).unwrap();

  assert!(timer.remove_task(id, true));
  thread::sleep(Duration::from_millis(250));
  assert!(!fired.load(Ordering::SeqCst));
}

#[test]
fn delay_can_be_postponed_and_shortened() {
  let timer = RelativeTimer::default();
  let (tx, rx) = mpsc::channel();
  let started = Instant::now();
  let postponed = {
    let tx = tx.clone();
    timer.add_delay_task(move || tx.send(("postponed", Instant::now())).unwrap(), Duration::from_millis(100)).unwrap()
  };
  let shortened =
    timer.add_delay_task(move || tx.send(("shortened", Instant::now())).unwrap(), Duration::from_secs(10)).unwrap();

  assert!(timer.update_task_period(postponed, Duration::from_millis(400)));
  assert!(timer.update_task_period(shortened, Duration::from_millis(150)));

  let (first, first_at) = rx.recv_timeout(PATIENCE).unwrap();
  let (second, second_at) = rx.recv_timeout(PATIENCE).unwrap();
  assert_eq!((first, second), ("shortened", "postponed"));
  assert!(first_at.duration_since(started) >= Duration::from_millis(145));
  assert!(second_at.duration_since(started) >= Duration::from_millis(395));
}

#[test]
fn period_task_runs_exactly_execute_count_times() {
  let timer = RelativeTimer::default();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  let id = timer
    .add_simple_period_task(
      move || {
        counter.fetch_add(1, Ordering::SeqCst);
      },
      Duration::from_millis(20),
      5,
    )
    .unwrap();

  assert!(wait_for(|| calls.load(Ordering::SeqCst) == 5));
  thread::sleep(Duration::from_millis(100));
  assert_eq!(calls.load(Ordering::SeqCst), 5);
  assert!(!timer.remove_task(id, false));
}

#[test]
fn returning_false_ends_the_series() {
  let timer = RelativeTimer::default();
  let counts = Arc::new(Mutex::new(Vec::new()));
  let recorded = counts.clone();
  timer
    .add_period_task(
      move |count| {
        recorded.lock().push(count);
        count < 3
      },
      Duration::from_millis(20),
      0,
    )
    .unwrap();

  assert!(wait_for(|| timer.is_empty()));
  assert_eq!(*counts.lock(), vec![1, 2, 3]);
}

#[test]
fn zero_period_is_rejected() {
  let timer = RelativeTimer::default();
  assert_eq!(timer.add_simple_period_task(|| {}, Duration::ZERO, 0), Err(TimerError::InvalidPeriod));
  assert_eq!(timer.add_precise_period_task(|_| true, Duration::ZERO, 0), Err(TimerError::InvalidPeriod));
  assert_eq!(timer.add_delay_task(|| {}, Duration::MAX), Err(TimerError::InvalidPeriod));
  assert!(timer.is_empty());
}

#[test]
fn period_can_be_updated_from_inside_the_callback() {
  let timer = Arc::new(RelativeTimer::default());
  let own_id = Arc::new(AtomicU64::new(0));
  let fired = Arc::new(Mutex::new(Vec::new()));
  let started = Instant::now();

  let id = {
    let timer_ref: Weak<RelativeTimer> = Arc::downgrade(&timer);
    let own_id = own_id.clone();
    let fired = fired.clone();
    timer
      .add_period_task(
        move |count| {
          fired.lock().push(Instant::now());
          if count == 1 {
            let id = TimerTaskId::new(own_id.load(Ordering::SeqCst));
            if let Some(timer) = timer_ref.upgrade() {
              assert!(timer.update_task_period(id, Duration::from_millis(300)));
            }
          }
          true
        },
        Duration::from_millis(50),
        2,
      )
      .unwrap()
  };
  own_id.store(id.raw(), Ordering::SeqCst);

  assert!(wait_for(|| fired.lock().len() == 2));
  let second = fired.lock()[1].duration_since(started);
  assert!(second >= Duration::from_millis(340), "second firing too early: {second:?}");
}

#[test]
fn precise_tasks_refuse_period_updates() {
  let timer = RelativeTimer::default();
  let id = timer.add_simple_precise_period_task(|| {}, Duration::from_secs(1), 0).unwrap();
  assert!(!timer.update_task_period(id, Duration::from_millis(10)));
  assert!(!timer.update_task_period(TimerTaskId::new(999), Duration::from_millis(10)));
  assert!(timer.remove_task(id, true));
}

#[test]
fn precise_series_keeps_its_phase_when_callbacks_overrun() {
  let timer = RelativeTimer::default();
  let fired = Arc::new(Mutex::new(Vec::new()));
  let recorded = fired.clone();
  let started = Instant::now();
  timer
    .add_simple_precise_period_task(
      move || {
        recorded.lock().push(Instant::now());
        thread::sleep(Duration::from_millis(150));
      },
      Duration::from_millis(100),
      3,
    )
    .unwrap();

  assert!(wait_for(|| fired.lock().len() == 3));
  let offsets: Vec<u128> = fired.lock().iter().map(|at| at.duration_since(started).as_millis()).collect();
  for offset in &offsets {
    let phase = offset % 100;
    assert!(phase <= 40 || phase >= 95, "firing off the phase grid: {offsets:?}");
  }
  for pair in offsets.windows(2) {
    assert!(pair[1] - pair[0] >= 180, "overrun period was not skipped: {offsets:?}");
  }
}

#[test]
fn simple_series_drifts_when_callbacks_overrun() {
  let timer = RelativeTimer::default();
  let fired = Arc::new(Mutex::new(Vec::new()));
  let recorded = fired.clone();
  let started = Instant::now();
  timer
    .add_simple_period_task(
      move || {
        recorded.lock().push(Instant::now());
        thread::sleep(Duration::from_millis(80));
      },
      Duration::from_millis(50),
      4,
    )
    .unwrap();

  assert!(wait_for(|| fired.lock().len() == 4));
  let last = fired.lock()[3].duration_since(started);
  assert!(last >= Duration::from_millis(280), "simple series did not drift: {last:?}");
}

#[test]
fn waiting_remove_blocks_until_the_callback_returns_and_releases_it() {
  let timer = RelativeTimer::default();
  let entered = Arc::new(CountDownLatch::new(1));
  let finished = Arc::new(AtomicBool::new(false));
  let released = Arc::new(AtomicBool::new(false));

  let id = {
    let entered = entered.clone();
    let finished = finished.clone();
    let guard = DropFlag(released.clone());
    timer
      .add_simple_period_task(
        move || {
          let _keep = &guard;
          entered.count_down();
          thread::sleep(Duration::from_millis(150));
          finished.store(true, Ordering::SeqCst);
        },
        Duration::from_millis(10),
        0,
      )
      .unwrap()
  };

  assert!(entered.wait_timeout(PATIENCE));
  assert!(timer.remove_task(id, true));
  assert!(finished.load(Ordering::SeqCst));
  assert!(released.load(Ordering::SeqCst));
}

#[test]
fn task_can_remove_itself_while_firing() {
  let timer = Arc::new(RelativeTimer::default());
  let own_id = Arc::new(AtomicU64::new(0));
  let calls = Arc::new(AtomicUsize::new(0));
  let removed = Arc::new(AtomicBool::new(false));

  let id = {
    let timer_ref = Arc::downgrade(&timer);
    let own_id = own_id.clone();
    let calls = calls.clone();
    let removed = removed.clone();
    timer
      .add_simple_period_task(
        move || {
          calls.fetch_add(1, Ordering::SeqCst);
          let id = TimerTaskId::new(own_id.load(Ordering::SeqCst));
          if let Some(timer) = timer_ref.upgrade() {
            if timer.remove_task(id, true) {
              removed.store(true, Ordering::SeqCst);
            }
          }
        },
        Duration::from_millis(30),
        0,
      )
      .unwrap()
  };
  own_id.store(id.raw(), Ordering::SeqCst);

  assert!(wait_for(|| removed.load(Ordering::SeqCst)));
  thread::sleep(Duration::from_millis(150));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert!(timer.is_empty());
}

#[test]
fn callbacks_may_add_tasks_to_their_own_timer() {
  let timer = Arc::new(RelativeTimer::default());
  let (tx, rx) = mpsc::channel();
  let timer_ref = Arc::downgrade(&timer);
  timer
    .add_delay_task(
      move || {
        if let Some(timer) = timer_ref.upgrade() {
          timer.start();
          timer.add_delay_task(move || tx.send("nested").unwrap(), Duration::from_millis(10)).unwrap();
        }
      },
      Duration::from_millis(10),
    )
    .unwrap();

  assert_eq!(rx.recv_timeout(PATIENCE), Ok("nested"));
}

#[test]
fn panicking_callback_is_reported_and_the_series_continues() {
  let timer = RelativeTimer::default();
  let panics = Arc::new(Mutex::new(Vec::new()));
  let handler: PanicHandler = {
    let panics = panics.clone();
    Arc::new(move |panic: &TaskPanic| panics.lock().push(panic.message().to_owned()))
  };
  timer.set_panic_handler(Some(handler));

  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  timer
    .add_period_task(
      move |count| {
        counter.fetch_add(1, Ordering::SeqCst);
        if count == 1 {
          panic!("first tick failed");
        }
        true
      },
      Duration::from_millis(20),
      3,
    )
    .unwrap();

  assert!(wait_for(|| calls.load(Ordering::SeqCst) == 3));
  assert_eq!(*panics.lock(), vec!["first tick failed".to_owned()]);
}

#[test]
fn stop_discards_pending_tasks() {
  let timer = RelativeTimer::default();
  let fired = Arc::new(AtomicBool::new(false));
  let flag = fired.clone();
  timer.add_delay_task(move || flag.store(true, Ordering::SeqCst), Duration::from_millis(100)).unwrap();
  assert_eq!(timer.len(), 1);

  timer.stop();
  assert!(!timer.is_running());
  assert!(timer.is_empty());
  thread::sleep(Duration::from_millis(250));
  assert!(!fired.load(Ordering::SeqCst));
}

#[test]
fn manual_timer_fires_only_after_start() {
  let timer = RelativeTimer::new(TimerConfig::new().with_automatic(false).with_thread_name("manual"));
  let (tx, rx) = mpsc::channel();
  timer.add_delay_task(move || tx.send(thread::current().name().map(str::to_owned)).unwrap(), Duration::ZERO).unwrap();

  assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
  assert!(!timer.is_running());

  timer.start();
  let name = rx.recv_timeout(PATIENCE).unwrap();
  assert_eq!(name.as_deref(), Some("timer[manual]-worker"));
}

#[test]
fn identifiers_increase_across_tasks() {
  let timer = RelativeTimer::new(TimerConfig::new().with_automatic(false));
  let first = timer.add_delay_task(|| {}, Duration::from_secs(1)).unwrap();
  let second = timer.add_simple_period_task(|| {}, Duration::from_secs(1), 0).unwrap();
  assert!(second > first);
  assert_eq!(timer.len(), 2);
}

#[test]
fn stop_from_a_callback_while_the_owner_stops_does_not_deadlock() {
  let timer = Arc::new(RelativeTimer::default());
  let entered = Arc::new(CountDownLatch::new(1));
  {
    let timer_ref = Arc::downgrade(&timer);
    let entered = entered.clone();
    timer
      .add_delay_task(
        move || {
          entered.count_down();
          thread::sleep(Duration::from_millis(100));
          if let Some(timer) = timer_ref.upgrade() {
            timer.stop();
          }
        },
        Duration::ZERO,
      )
      .unwrap();
  }
  assert!(entered.wait_timeout(PATIENCE));

  let (tx, rx) = mpsc::channel();
  let stopper = {
    let timer = timer.clone();
    thread::spawn(move || {
      timer.stop();
      tx.send(()).unwrap();
    })
  };
  assert!(rx.recv_timeout(PATIENCE).is_ok());
  stopper.join().unwrap();
  assert!(!timer.is_running());
  assert!(timer.is_empty());
}
