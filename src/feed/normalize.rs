//! Raw payload -> canonical series normalization

use crate::error::{Result, SpotdashError};
use crate::feed::types::{FxRates, PricePoint};
use crate::logging::get_logger;
use crate::zones::{BiddingZone, Currency};
use chrono::{DateTime, Utc};

/// Normalize a raw provider payload into the canonical series for a zone.
///
/// The payload must carry the price items under a `prices` array; a missing
/// or non-array field is a malformed feed and fails the whole refresh. Items
/// inside the array are validated individually and silently dropped when
/// invalid, since partial feed corruption is expected and tolerated.
///
/// Conversion: `EUR/MWh * minor_units_per_EUR / 1000` yields the local minor
/// unit per kWh; the zone's VAT multiplier is applied on top when the feed is
/// known to be VAT-exclusive. Output is sorted ascending by timestamp with
/// duplicate timestamps removed (first occurrence wins).
pub fn normalize(
    payload: &serde_json::Value,
    zone: &BiddingZone,
    fx: FxRates,
    vat_exclusive: bool,
) -> Result<Vec<PricePoint>> {
    let items = payload
        .get("prices")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            SpotdashError::malformed_feed("payload has no 'prices' array".to_string())
        })?;

    let minor_per_eur = minor_units_per_eur(zone.currency, fx);
    let vat = if vat_exclusive {
        zone.vat_multiplier()
    } else {
        1.0
    };

    let mut out: Vec<PricePoint> = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        let Some(point) = parse_item(item, minor_per_eur, vat) else {
            dropped += 1;
            continue;
        };
        out.push(point);
    }

    if dropped > 0 {
        let logger = get_logger("feed");
        logger.debug(&format!(
            "Dropped {} invalid feed item(s) for zone {}",
            dropped, zone.code
        ));
    }

    // Provider payloads are not guaranteed ordered
    out.sort_by_key(|p| p.timestamp);
    out.dedup_by(|a, b| a.timestamp == b.timestamp);
    Ok(out)
}

/// Minor currency units per EUR for a zone's currency
pub fn minor_units_per_eur(currency: Currency, fx: FxRates) -> f64 {
    match currency {
        Currency::EUR => 100.0,
        Currency::SEK => fx.eur_to_sek * 100.0,
        Currency::NOK => fx.eur_to_nok * 100.0,
    }
}

fn parse_item(item: &serde_json::Value, minor_per_eur: f64, vat: f64) -> Option<PricePoint> {
    let ts_str = item.get("datetime")?.as_str()?;
    let eur_per_mwh = item.get("price")?.as_f64()?;
    if !eur_per_mwh.is_finite() {
        return None;
    }
    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(ts_str)
        .ok()?
        .with_timezone(&Utc);
    let price = eur_per_mwh * minor_per_eur / 1000.0 * vat;
    Some(PricePoint { timestamp, price })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::zone_for;
    use serde_json::json;

    fn fx() -> FxRates {
        FxRates {
            eur_to_sek: 11.0,
            eur_to_nok: 11.0,
        }
    }

    #[test]
    fn missing_prices_field_is_malformed() {
        let payload = json!({"something": "else"});
        let err = normalize(&payload, zone_for(Some("FI")), fx(), false).unwrap_err();
        assert!(matches!(err, SpotdashError::MalformedFeed { .. }));

        let payload = json!({"prices": "not-an-array"});
        assert!(normalize(&payload, zone_for(Some("FI")), fx(), false).is_err());
    }

    #[test]
    fn eur_mwh_converts_to_cents_per_kwh() {
        // 50 EUR/MWh -> 5.0 c/kWh before VAT
        let payload = json!({"prices": [
            {"datetime": "2024-06-01T10:00:00Z", "price": 50.0},
        ]});
        let series = normalize(&payload, zone_for(Some("FI")), fx(), false).unwrap();
        assert_eq!(series.len(), 1);
        assert!((series[0].price - 5.0).abs() < 1e-9);
    }

    #[test]
    fn sek_conversion_uses_fx_rate() {
        // 50 EUR/MWh at 11 SEK/EUR -> 55 öre/kWh before VAT
        let payload = json!({"prices": [
            {"datetime": "2024-06-01T10:00:00Z", "price": 50.0},
        ]});
        let series = normalize(&payload, zone_for(Some("SE3")), fx(), false).unwrap();
        assert!((series[0].price - 55.0).abs() < 1e-9);
    }

    #[test]
    fn vat_multiplier_applies_per_zone() {
        let payload = json!({"prices": [
            {"datetime": "2024-06-01T10:00:00Z", "price": 50.0},
        ]});
        // FI: 25.5% VAT
        let fi = normalize(&payload, zone_for(Some("FI")), fx(), true).unwrap();
        assert!((fi[0].price - 5.0 * 1.255).abs() < 1e-9);
        // SE: 25% VAT
        let se = normalize(&payload, zone_for(Some("SE3")), fx(), true).unwrap();
        assert!((se[0].price - 55.0 * 1.25).abs() < 1e-9);
    }

    #[test]
    fn invalid_items_are_dropped_not_fatal() {
        let payload = json!({"prices": [
            {"datetime": "2024-06-01T11:00:00Z", "price": 40.0},
            {"datetime": 12345, "price": 40.0},
            {"price": 40.0},
            {"datetime": "not a timestamp", "price": 40.0},
            {"datetime": "2024-06-01T12:00:00Z", "price": "NaN"},
            {"datetime": "2024-06-01T10:00:00Z", "price": 30.0},
            null,
        ]});
        let series = normalize(&payload, zone_for(Some("FI")), fx(), false).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        let payload = json!({"prices": [
            {"datetime": "2024-06-01T12:00:00Z", "price": 30.0},
            {"datetime": "2024-06-01T10:00:00Z", "price": 10.0},
            {"datetime": "2024-06-01T10:00:00Z", "price": 99.0},
            {"datetime": "2024-06-01T11:00:00Z", "price": 20.0},
        ]});
        let series = normalize(&payload, zone_for(Some("FI")), fx(), false).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        // first occurrence wins for duplicate timestamps
        assert!((series[0].price - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_array_yields_empty_series() {
        let payload = json!({"prices": []});
        let series = normalize(&payload, zone_for(Some("FI")), fx(), false).unwrap();
        assert!(series.is_empty());
    }
}
