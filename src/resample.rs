//! Resolution resampling between hourly and 15-minute cadence
//!
//! Aggregation truncates timestamps to the top of their UTC hour; hour
//! boundaries for grouping are timezone-independent because they operate on
//! absolute instants. Expansion replicates each hourly price across the four
//! quarter hours (flat interpolation, an approximation policy rather than
//! real sub-hourly data).

use crate::feed::PricePoint;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Display resolution requested by a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Resolution {
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "15min")]
    FifteenMin,
}

impl Resolution {
    /// Parse the wire label used by the API (`hourly` / `15min`)
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "hourly" => Some(Self::Hourly),
            "15min" => Some(Self::FifteenMin),
            _ => None,
        }
    }

    /// Samples per hour at this resolution
    pub fn ticks_per_hour(self) -> usize {
        match self {
            Self::Hourly => 1,
            Self::FifteenMin => 4,
        }
    }
}

/// Native cadence of a series as detected from its leading gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Hourly,
    FifteenMinute,
}

// 1s slack for clock jitter in provider timestamps
const FIFTEEN_MIN_MAX_GAP_SECS: i64 = 15 * 60 + 1;

/// Detect the native cadence from the gap between the first two points.
/// Series shorter than two points are treated as hourly.
pub fn native_cadence(series: &[PricePoint]) -> Cadence {
    if series.len() < 2 {
        return Cadence::Hourly;
    }
    let gap = (series[1].timestamp - series[0].timestamp).num_seconds().abs();
    if gap <= FIFTEEN_MIN_MAX_GAP_SECS {
        Cadence::FifteenMinute
    } else {
        Cadence::Hourly
    }
}

/// Aggregate a series to hourly cadence by averaging within each UTC hour.
/// Output is sorted ascending; empty groups cannot occur by construction.
pub fn to_hourly(series: &[PricePoint]) -> Vec<PricePoint> {
    let mut groups: BTreeMap<DateTime<Utc>, (f64, u32)> = BTreeMap::new();
    for point in series {
        let hour = truncate_to_hour(point.timestamp);
        let entry = groups.entry(hour).or_insert((0.0, 0));
        entry.0 += point.price;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(timestamp, (sum, count))| PricePoint {
            timestamp,
            price: sum / f64::from(count),
        })
        .collect()
}

/// Expand an hourly series to 15-minute cadence with flat interpolation:
/// each point yields four samples at 0/15/30/45 minutes past its hour.
pub fn expand_to_fifteen_min(series: &[PricePoint]) -> Vec<PricePoint> {
    let mut out: Vec<PricePoint> = Vec::with_capacity(series.len() * 4);
    for point in series {
        let hour = truncate_to_hour(point.timestamp);
        for offset in [0, 15, 30, 45] {
            out.push(PricePoint {
                timestamp: hour + Duration::minutes(offset),
                price: point.price,
            });
        }
    }
    out.sort_by_key(|p| p.timestamp);
    out
}

/// Produce the series at the requested display resolution.
///
/// A 15-minute request passes a native 15-minute series through unchanged;
/// anything else is aggregated to hourly first and then expanded, so that
/// expanded points always align to clean quarter-hour boundaries.
pub fn at_resolution(series: &[PricePoint], resolution: Resolution) -> Vec<PricePoint> {
    match resolution {
        Resolution::Hourly => to_hourly(series),
        Resolution::FifteenMin => {
            if native_cadence(series) == Cadence::FifteenMinute {
                series.to_vec()
            } else {
                expand_to_fifteen_min(&to_hourly(series))
            }
        }
    }
}

fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let trunc = secs - secs.rem_euclid(3600);
    DateTime::<Utc>::from_timestamp(trunc, 0).unwrap_or(ts)
}
