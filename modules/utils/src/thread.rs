use std::{
  io,
  thread::{self, JoinHandle},
};

#[cfg(test)]
mod tests;

/// Spawns a worker thread carrying `name` for diagnostics.
///
/// # Errors
///
/// Returns the OS error when the thread cannot be created.
pub fn spawn_named<F>(name: String, body: F) -> io::Result<JoinHandle<()>>
where
  F: FnOnce() + Send + 'static, {
  thread::Builder::new().name(name).spawn(body)
}

/// Builds a worker name of the form `<prefix>` or `<prefix>[<label>]`, followed by `-<role>`.
#[must_use]
pub fn worker_name(prefix: &str, label: Option<&str>, role: &str) -> String {
  match label {
    | Some(label) if !label.is_empty() => format!("{prefix}[{label}]-{role}"),
    | _ => format!("{prefix}-{role}"),
  }
}
