use chrono::{DateTime, TimeZone, Utc};
use spotdash::calendar::{local_date_string, resolve_timezone};
use spotdash::staleness::{Freshness, evaluate};

const CUTOFF: u32 = 14 * 60 + 20;

fn helsinki() -> chrono_tz::Tz {
    resolve_timezone("Europe/Helsinki").unwrap()
}

// Helsinki wall clock in June is UTC+3
fn june(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    helsinki()
        .with_ymd_and_hms(2024, 6, d, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn morning_fetch_serves_all_morning_then_expires_at_cutoff() {
    let tz = helsinki();
    let fetched = june(10, 9, 0);
    let date = local_date_string(fetched, tz);

    assert_eq!(
        evaluate(&date, fetched, june(10, 14, 19), tz, CUTOFF),
        Freshness::Fresh
    );
    // The cutoff minute itself already demands a refetch
    assert_eq!(
        evaluate(&date, fetched, june(10, 14, 20), tz, CUTOFF),
        Freshness::Stale
    );
}

#[test]
fn afternoon_fetch_lasts_until_local_midnight() {
    let tz = helsinki();
    let fetched = june(10, 15, 0);
    let date = local_date_string(fetched, tz);

    assert_eq!(
        evaluate(&date, fetched, june(10, 23, 59), tz, CUTOFF),
        Freshness::Fresh
    );
    assert_eq!(
        evaluate(&date, fetched, june(11, 0, 5), tz, CUTOFF),
        Freshness::Stale
    );
}

#[test]
fn staleness_follows_provider_local_midnight_not_utc() {
    let tz = helsinki();
    // 22:30Z on June 10 is already 01:30 on June 11 in Helsinki
    let fetched = june(10, 15, 0);
    let date = local_date_string(fetched, tz);
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 22, 30, 0).unwrap();
    assert_eq!(evaluate(&date, fetched, now, tz, CUTOFF), Freshness::Stale);
}
