use std::sync::Arc;

mod panic_sink;
mod task_panic;

pub use panic_sink::PanicSink;
pub use task_panic::TaskPanic;

/// Callback receiving panics raised by user code on a worker thread.
pub type PanicHandler = Arc<dyn Fn(&TaskPanic) + Send + Sync + 'static>;
