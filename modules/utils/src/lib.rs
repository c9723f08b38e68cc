#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![deny(rustdoc::broken_intra_doc_links)]

//! Shared building blocks for the fundament runtime.
//!
//! The runtime's timer engine, thread pool and callback registry are all built from the same
//! small vocabulary: a latched [`Event`](sync::Event) to park and wake workers, a
//! [`CountDownLatch`](sync::CountDownLatch) for rendezvous, [`TaskPanic`](panic::TaskPanic)
//! and [`PanicSink`](panic::PanicSink) to keep user panics from escaping a worker, and an
//! [`IdAllocator`](id::IdAllocator) for the positive identifiers handed back to callers.

/// Monotonic identifier allocation.
pub mod id;
/// Panic capture and routing for user code executed on worker threads.
pub mod panic;
/// Wait primitives measured on the monotonic clock.
pub mod sync;
/// Helpers for spawning named worker threads.
pub mod thread;
