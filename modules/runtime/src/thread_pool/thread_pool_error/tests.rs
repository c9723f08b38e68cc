use super::ThreadPoolError;

#[test]
fn display_messages() {
  assert_eq!(
    ThreadPoolError::NoWorkers.to_string(),
    "thread pool has no core workers and auto expansion is disabled"
  );
  assert_eq!(
    ThreadPoolError::InvalidMaxSize { core_size: 4, max_size: 2 }.to_string(),
    "thread pool max size 2 is invalid for core size 4"
  );
}
