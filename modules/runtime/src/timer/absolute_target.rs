use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use super::TimerError;


/// Wall-clock instant an [`AbsoluteTimer`](super::AbsoluteTimer) task fires at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsoluteTarget {
  instant: DateTime<Utc>,
}

impl AbsoluteTarget {
  /// Resolves a local calendar time.
  ///
  /// Ambiguous times (clocks turned back) resolve to the earlier instant.
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidTarget`] when the time does not exist in the local time zone.
  pub fn from_local(local: NaiveDateTime) -> Result<Self, TimerError> {
    Local.from_local_datetime(&local).earliest().map(Self::from).ok_or(TimerError::InvalidTarget)
  }

  /// Target `delay` after the current wall-clock time.
  ///
  /// # Errors
  ///
  /// Returns [`TimerError::InvalidTarget`] when the sum overflows the system clock.
  pub fn after(delay: Duration) -> Result<Self, TimerError> {
    SystemTime::now().checked_add(delay).map(Self::from).ok_or(TimerError::InvalidTarget)
  }

  /// Returns the target as a UTC date-time.
  #[must_use]
  pub const fn as_datetime(&self) -> DateTime<Utc> {
    self.instant
  }

  /// Nanoseconds since the UNIX epoch, `None` outside the representable range.
  pub(crate) fn ticks(&self) -> Option<i64> {
    self.instant.timestamp_nanos_opt()
  }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for AbsoluteTarget {
  fn from(value: DateTime<Tz>) -> Self {
    Self { instant: value.with_timezone(&Utc) }
  }
}

impl From<SystemTime> for AbsoluteTarget {
  fn from(value: SystemTime) -> Self {
    Self { instant: DateTime::<Utc>::from(value) }
  }
}
