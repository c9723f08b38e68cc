#![deny(rustdoc::broken_intra_doc_links)]

//! Umbrella crate for the fundament concurrency substrate.
//!
//! Re-exports the [`utils`] primitives (events, latches, panic capture) and the [`runtime`]
//! components built on them (timers, thread pool, callback registries).

pub use fundament_runtime_rs as runtime;
pub use fundament_utils_rs as utils;


/// Returns the version of this crate.
#[must_use]
pub const fn crate_version() -> &'static str {
  env!("CARGO_PKG_VERSION")
}
