//! Local-day partitioning of a resampled series
//!
//! Pure filters over a series and an explicit reference instant. The caller
//! samples the clock once and threads the same `now` through every stage, so
//! the today/tomorrow/future subsets can never disagree with each other or
//! with the window optimizer's search origin.

use crate::calendar;
use crate::feed::PricePoint;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Points on the same local calendar day as `now` in the zone's timezone
pub fn today(series: &[PricePoint], now: DateTime<Utc>, tz: Tz) -> Vec<PricePoint> {
    series
        .iter()
        .copied()
        .filter(|p| calendar::same_local_day(p.timestamp, now, tz))
        .collect()
}

/// Points on the local calendar day after `now`.
///
/// The target day is found by advancing the local calendar date by one,
/// never by adding 86,400,000 ms; around DST transitions those are not the
/// same thing.
pub fn tomorrow(series: &[PricePoint], now: DateTime<Utc>, tz: Tz) -> Vec<PricePoint> {
    let Some(target) = calendar::local_date(now, tz).succ_opt() else {
        return Vec::new();
    };
    series
        .iter()
        .copied()
        .filter(|p| calendar::local_date(p.timestamp, tz) == target)
        .collect()
}

/// Points at or after `now`. Absolute instant comparison, timezone
/// independent, inclusive of a point exactly at `now`.
pub fn future(series: &[PricePoint], now: DateTime<Utc>) -> Vec<PricePoint> {
    series
        .iter()
        .copied()
        .filter(|p| p.timestamp >= now)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::resolve_timezone;
    use chrono::TimeZone;

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
    }

    fn point(d: u32, h: u32) -> PricePoint {
        PricePoint {
            timestamp: utc(d, h),
            price: 1.0,
        }
    }

    #[test]
    fn today_and_tomorrow_split_on_local_midnight() {
        let tz = resolve_timezone("Europe/Helsinki").unwrap();
        // Helsinki is UTC+3 in June; local midnight is 21:00Z the previous day
        let series = vec![point(1, 10), point(1, 20), point(1, 21), point(2, 10)];
        let now = utc(1, 12);

        let today_points = today(&series, now, tz);
        assert_eq!(today_points.len(), 2);

        let tomorrow_points = tomorrow(&series, now, tz);
        assert_eq!(tomorrow_points.len(), 2);
        assert_eq!(tomorrow_points[0].timestamp, utc(1, 21));
    }

    #[test]
    fn tomorrow_is_calendar_based_across_dst() {
        // Spring-forward night in Helsinki: March 31 has only 23 local hours.
        // Tomorrow from March 30 must still be the full local March 31.
        let tz = resolve_timezone("Europe/Helsinki").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap();
        let series = vec![
            PricePoint {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 30, 23, 0, 0).unwrap(),
                price: 1.0,
            },
            PricePoint {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap(),
                price: 2.0,
            },
            PricePoint {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 31, 20, 0, 0).unwrap(),
                price: 3.0,
            },
            PricePoint {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 31, 21, 0, 0).unwrap(),
                price: 4.0,
            },
        ];
        let tomorrow_points = tomorrow(&series, now, tz);
        // 21:00Z on the 31st is already April 1 local (UTC+3 after the shift)
        assert_eq!(tomorrow_points.len(), 3);
        assert!((tomorrow_points[2].price - 3.0).abs() < 1e-9);
    }

    #[test]
    fn future_is_inclusive_at_now() {
        let series = vec![point(1, 10), point(1, 11), point(1, 12)];
        let got = future(&series, utc(1, 11));
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].timestamp, utc(1, 11));
    }
}
