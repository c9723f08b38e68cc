
/// How a periodic relative task computes its next deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RearmPolicy {
  /// Next deadline is the previous firing tick plus the period; slow callbacks push the series back.
  Simple,
  /// Next deadline stays on the original phase grid, skipping periods that already elapsed.
  Precise,
}

impl RearmPolicy {
  /// Deadline following a firing that started at `last_fire` and finished at `now`.
  pub(crate) const fn next_deadline(self, previous_deadline: i64, last_fire: i64, period: i64, now: i64) -> i64 {
    match self {
      | Self::Simple => last_fire.saturating_add(period),
      | Self::Precise => {
        let elapsed = now.saturating_sub(previous_deadline);
        let periods = if elapsed < 0 { 1 } else { elapsed / period + 1 };
        previous_deadline.saturating_add(period.saturating_mul(periods))
      },
    }
  }
}
