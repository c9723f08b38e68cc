use std::{
  fmt,
  sync::{Arc, Mutex},
};

use tracing::{
  Event, Level, Metadata, Subscriber,
  field::{Field, Visit},
  span::{Attributes, Id, Record},
  subscriber::with_default,
};

use super::PanicSink;
use crate::panic::{PanicHandler, TaskPanic};

#[test]
fn report_invokes_installed_handler() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = PanicSink::new();
  let handler: PanicHandler = {
    let seen = seen.clone();
    Arc::new(move |panic: &TaskPanic| seen.lock().unwrap().push(panic.message().to_owned()))
  };
  sink.set_handler(Some(handler));

  sink.report(&TaskPanic::new("first"));
  sink.report(&TaskPanic::new("second"));

  assert_eq!(*seen.lock().unwrap(), vec!["first".to_owned(), "second".to_owned()]);
}

#[test]
fn report_without_handler_logs_a_warning() {
  let collector = RecordingSubscriber::default();
  let shared = collector.clone();
  with_default(shared, || {
    PanicSink::new().report(&TaskPanic::new("lost"));
  });

  let events = collector.events();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].level, Level::WARN);
  assert_eq!(events[0].target, PanicSink::LOG_TARGET);
  assert_eq!(events[0].panic.as_deref(), Some("lost"));
}

#[test]
fn clearing_the_handler_restores_logging() {
  let sink = PanicSink::new();
  sink.set_handler(Some(Arc::new(|_: &TaskPanic| {})));
  assert!(sink.handler().is_some());
  sink.set_handler(None);
  assert!(sink.handler().is_none());
  assert!(format!("{sink:?}").contains("has_handler: false"));
}

#[derive(Clone, Default)]
struct RecordingSubscriber {
  events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl RecordingSubscriber {
  fn events(&self) -> Vec<CapturedEvent> {
    self.events.lock().expect("lock").clone()
  }
}

impl Subscriber for RecordingSubscriber {
  fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
    true
  }

  fn new_span(&self, _: &Attributes<'_>) -> Id {
    Id::from_u64(1)
  }

  fn record(&self, _: &Id, _: &Record<'_>) {}

  fn record_follows_from(&self, _: &Id, _: &Id) {}

  fn event(&self, event: &Event<'_>) {
    let metadata = event.metadata();
    let mut visitor = PanicVisitor::default();
    event.record(&mut visitor);
    self.events.lock().expect("lock").push(CapturedEvent {
      level:  *metadata.level(),
      target: metadata.target().to_owned(),
      panic:  visitor.panic,
    });
  }

  fn enter(&self, _: &Id) {}

  fn exit(&self, _: &Id) {}
}

#[derive(Clone, Debug)]
struct CapturedEvent {
  level:  Level,
  target: String,
  panic:  Option<String>,
}

#[derive(Default)]
struct PanicVisitor {
  panic: Option<String>,
}

impl Visit for PanicVisitor {
  fn record_str(&mut self, field: &Field, value: &str) {
    if field.name() == "panic" {
      self.panic = Some(value.to_owned());
    }
  }

  fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
    if field.name() == "panic" && self.panic.is_none() {
      self.panic = Some(format!("{value:?}").trim_matches('"').to_owned());
    }
  }
}
