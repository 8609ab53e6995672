//! Timezone-aware calendar helpers
//!
//! Instants are kept in UTC everywhere; when a day-boundary decision is
//! needed the instant is projected into the target zone and compared by
//! calendar components. Day boundaries must never be derived from
//! millisecond offsets because of DST transitions.

use crate::error::{Result, SpotdashError};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Local wall-clock components of an instant in some zone.
///
/// Month is 0-based. Used only for comparison, never for arithmetic
/// across days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// Resolve an IANA timezone name against the tz database.
///
/// An unrecognized name is a fatal configuration error; silently falling
/// back to a fixed offset would corrupt every downstream day-boundary
/// decision.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    Tz::from_str(name).map_err(|_| SpotdashError::config(format!("Unknown timezone '{}'", name)))
}

/// Project an instant into a zone and extract its calendar components
pub fn to_calendar(instant: DateTime<Utc>, tz: Tz) -> CalendarComponents {
    let local = instant.with_timezone(&tz);
    CalendarComponents {
        year: local.year(),
        month: local.month0(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
    }
}

/// Whether two instants fall on the same local calendar day in a zone
pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    let ca = to_calendar(a, tz);
    let cb = to_calendar(b, tz);
    ca.year == cb.year && ca.month == cb.month && ca.day == cb.day
}

/// Local calendar date of an instant in a zone
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Local calendar date as `YYYY-MM-DD`, used as the cache date key
pub fn local_date_string(instant: DateTime<Utc>, tz: Tz) -> String {
    local_date(instant, tz).format("%Y-%m-%d").to_string()
}

/// Minutes elapsed since local midnight for an instant in a zone
pub fn minutes_of_day(instant: DateTime<Utc>, tz: Tz) -> u32 {
    let local = instant.with_timezone(&tz);
    local.hour() * 60 + local.minute()
}
