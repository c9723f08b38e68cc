use super::TimerError;

#[test]
fn display_messages() {
  assert_eq!(TimerError::InvalidPeriod.to_string(), "invalid timer period");
  assert_eq!(TimerError::InvalidTarget.to_string(), "invalid timer target");
}
