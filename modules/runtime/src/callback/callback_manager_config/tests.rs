use super::CallbackManagerConfig;

#[test]
fn defaults_are_unbounded_and_serialised() {
  let config = CallbackManagerConfig::default();
  assert_eq!(config.max_callbacks(), 0);
  assert!(!config.concurrent_call());
  assert!(!config.is_full(usize::MAX));
}

#[test]
fn capacity_is_reached_at_max_callbacks() {
  let config = CallbackManagerConfig::new().with_max_callbacks(2).with_concurrent_call(true);
  assert!(config.concurrent_call());
  assert!(!config.is_full(1));
  assert!(config.is_full(2));
}
