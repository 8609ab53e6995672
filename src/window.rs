//! Charging window optimization
//!
//! Finds the contiguous fixed-length window with the minimum average price.
//! Uses a sliding sum, so the scan is O(n); ties keep the first window seen,
//! which makes the result deterministic.

use crate::error::{Result, SpotdashError};
use crate::feed::PricePoint;
use serde::Serialize;

/// The recommended charging window.
///
/// Indices point into the specific series the search ran over; they are not
/// portable across resolutions or series instances and must be recomputed
/// whenever the series, resolution, or reference time changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargingWindow {
    pub start_index: usize,
    pub end_index: usize,
    pub average_price: f64,
}

/// Find the contiguous window of `window_len` ticks with the smallest mean
/// price. The first window with the minimal mean wins ties.
///
/// Fails with `InsufficientData` when the series cannot hold a full window;
/// callers surface that as "no recommendation available" rather than a hard
/// error.
pub fn best_window(series: &[PricePoint], window_len: usize) -> Result<ChargingWindow> {
    if window_len == 0 {
        return Err(SpotdashError::insufficient_data(
            "window length must be at least one tick",
        ));
    }
    if series.len() < window_len {
        return Err(SpotdashError::insufficient_data(format!(
            "series has {} point(s), need {}",
            series.len(),
            window_len
        )));
    }

    let mut sum: f64 = series[..window_len].iter().map(|p| p.price).sum();
    let mut best_sum = sum;
    let mut best_start = 0usize;

    for start in 1..=(series.len() - window_len) {
        sum += series[start + window_len - 1].price - series[start - 1].price;
        if sum < best_sum {
            best_sum = sum;
            best_start = start;
        }
    }

    Ok(ChargingWindow {
        start_index: best_start,
        end_index: best_start + window_len - 1,
        average_price: best_sum / window_len as f64,
    })
}
