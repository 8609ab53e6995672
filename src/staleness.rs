//! Staleness state machine for cached price series
//!
//! Day-ahead prices are published once daily at a fixed provider-local clock
//! time. Before that cutoff there is nothing new to fetch, so same-day data
//! stays fresh no matter when it was fetched; after the cutoff, data fetched
//! before it must be refreshed to pick up the next day's prices. Data whose
//! cached calendar date is no longer today is always stale.

use crate::calendar;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Freshness of a cached series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Evaluate the cached entry's freshness against `now`.
///
/// `cached_date` is the provider-local calendar date recorded at fetch time
/// (`YYYY-MM-DD`), `cutoff_minutes` the daily publication cutoff in minutes
/// after provider-local midnight.
pub fn evaluate(
    cached_date: &str,
    fetched_at: DateTime<Utc>,
    now: DateTime<Utc>,
    publish_tz: Tz,
    cutoff_minutes: u32,
) -> Freshness {
    let today = calendar::local_date_string(now, publish_tz);
    if cached_date != today {
        return Freshness::Stale;
    }

    if calendar::minutes_of_day(now, publish_tz) >= cutoff_minutes {
        // Past the cutoff: only data fetched today at or after the cutoff
        // already carries the new publication.
        if calendar::local_date_string(fetched_at, publish_tz) != today {
            return Freshness::Stale;
        }
        if calendar::minutes_of_day(fetched_at, publish_tz) >= cutoff_minutes {
            return Freshness::Fresh;
        }
        return Freshness::Stale;
    }

    // Before the cutoff, same-day data is always fresh
    Freshness::Fresh
}
