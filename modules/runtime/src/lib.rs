#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![deny(rustdoc::broken_intra_doc_links)]

//! Concurrency substrate for the fundament foundation library.
//!
//! Three peer components live here:
//!
//! - [`timer`]: a deadline-ordered timer engine with a steady-clock [`RelativeTimer`](timer::RelativeTimer)
//!   and a wall-clock [`AbsoluteTimer`](timer::AbsoluteTimer). Each timer owns one worker thread.
//! - [`thread_pool`]: an elastic [`ThreadPool`](thread_pool::ThreadPool) with core workers and self-retiring
//!   temporary workers.
//! - [`callback`]: concurrent fan-out registries, [`CallbackManager`](callback::CallbackManager) and the
//!   name-grouped [`NameCallbackManager`](callback::NameCallbackManager).
//!
//! User code is always run behind a panic boundary; panics are routed to the component's
//! [`PanicHandler`](fundament_utils_rs::panic::PanicHandler) instead of unwinding through a worker.

/// Concurrent callback registries.
pub mod callback;
/// Elastic worker thread pool.
pub mod thread_pool;
/// Deadline-ordered timer engine and its absolute/relative façades.
pub mod timer;
