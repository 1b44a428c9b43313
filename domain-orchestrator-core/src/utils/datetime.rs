//! Date arithmetic helpers.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `now` until `when`, rounded up.
///
/// This is the one rounding rule shared by certificate verification and the
/// reminder scan: `ceil((when - now) / 1 day)`. Anything at or past `now`
/// yields `<= 0`.
#[must_use]
pub fn days_until(when: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (when - now).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) > 0)
}
