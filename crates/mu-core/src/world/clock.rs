//! Wall-clock timestamps used by the per-tick gates (next action, regen)

use chrono::{DateTime, Utc};

/// Wall-clock instant. Gates compare against the `now` handed to each tick.
pub type Timestamp = DateTime<Utc>;

pub use chrono::TimeDelta;

/// Interval of `ms` milliseconds.
pub fn millis(ms: u32) -> TimeDelta {
    TimeDelta::milliseconds(ms as i64)
}

/// Interval of `secs` seconds.
pub fn seconds(secs: u32) -> TimeDelta {
    TimeDelta::seconds(secs as i64)
}
