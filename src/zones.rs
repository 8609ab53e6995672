//! Static bidding-zone reference data
//!
//! One entry per Nordic bidding zone, loaded at startup and immutable. The
//! zone carries everything the pipeline needs to localize a price series:
//! the IANA timezone for day boundaries, the currency for unit conversion
//! and the VAT percentage applied when the feed is VAT-exclusive.

use serde::Serialize;

/// Settlement currency of a bidding zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Currency {
    EUR,
    SEK,
    NOK,
}

/// Static reference data for one bidding zone
#[derive(Debug, Clone, Serialize)]
pub struct BiddingZone {
    pub code: &'static str,
    pub country: &'static str,
    pub timezone: &'static str,
    pub currency: Currency,
    /// Minor unit per kWh, e.g. c/kWh, öre/kWh, øre/kWh
    pub unit_label: &'static str,
    pub currency_symbol: &'static str,
    pub vat_percent: f64,
}

/// Code of the default zone used when a lookup misses
pub const DEFAULT_ZONE: &str = "FI";

static ZONES: &[BiddingZone] = &[
    BiddingZone {
        code: "FI",
        country: "FI",
        timezone: "Europe/Helsinki",
        currency: Currency::EUR,
        unit_label: "c/kWh",
        currency_symbol: "€",
        vat_percent: 25.5,
    },
    BiddingZone {
        code: "SE1",
        country: "SE",
        timezone: "Europe/Stockholm",
        currency: Currency::SEK,
        unit_label: "öre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "SE2",
        country: "SE",
        timezone: "Europe/Stockholm",
        currency: Currency::SEK,
        unit_label: "öre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "SE3",
        country: "SE",
        timezone: "Europe/Stockholm",
        currency: Currency::SEK,
        unit_label: "öre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "SE4",
        country: "SE",
        timezone: "Europe/Stockholm",
        currency: Currency::SEK,
        unit_label: "öre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "NO1",
        country: "NO",
        timezone: "Europe/Oslo",
        currency: Currency::NOK,
        unit_label: "øre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "NO2",
        country: "NO",
        timezone: "Europe/Oslo",
        currency: Currency::NOK,
        unit_label: "øre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "NO3",
        country: "NO",
        timezone: "Europe/Oslo",
        currency: Currency::NOK,
        unit_label: "øre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "NO4",
        country: "NO",
        timezone: "Europe/Oslo",
        currency: Currency::NOK,
        unit_label: "øre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
    BiddingZone {
        code: "NO5",
        country: "NO",
        timezone: "Europe/Oslo",
        currency: Currency::NOK,
        unit_label: "øre/kWh",
        currency_symbol: "kr",
        vat_percent: 25.0,
    },
];

/// All known bidding zones
pub fn all() -> &'static [BiddingZone] {
    ZONES
}

/// Look up a zone by code; unknown or absent codes fall back to the default
pub fn zone_for(code: Option<&str>) -> &'static BiddingZone {
    let wanted = code.unwrap_or(DEFAULT_ZONE).trim().to_uppercase();
    ZONES
        .iter()
        .find(|z| z.code == wanted)
        .or_else(|| ZONES.iter().find(|z| z.code == DEFAULT_ZONE))
        .unwrap_or(&ZONES[0])
}

impl BiddingZone {
    /// VAT multiplier applied to VAT-exclusive feed prices
    pub fn vat_multiplier(&self) -> f64 {
        1.0 + self.vat_percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(zone_for(Some("se3")).code, "SE3");
        assert_eq!(zone_for(Some(" NO5 ")).code, "NO5");
    }

    #[test]
    fn unknown_or_missing_code_falls_back_to_default() {
        assert_eq!(zone_for(Some("DE")).code, DEFAULT_ZONE);
        assert_eq!(zone_for(None).code, DEFAULT_ZONE);
        assert_eq!(zone_for(Some("")).code, DEFAULT_ZONE);
    }

    #[test]
    fn every_zone_has_a_resolvable_timezone() {
        for zone in all() {
            assert!(
                crate::calendar::resolve_timezone(zone.timezone).is_ok(),
                "zone {} has bad timezone {}",
                zone.code,
                zone.timezone
            );
        }
    }

    #[test]
    fn vat_multiplier_matches_percentage() {
        let fi = zone_for(Some("FI"));
        assert!((fi.vat_multiplier() - 1.255).abs() < 1e-9);
        let se = zone_for(Some("SE1"));
        assert!((se.vat_multiplier() - 1.25).abs() < 1e-9);
    }
}
