use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sample of the canonical price series.
///
/// The timestamp is UTC-anchored; the price is in the minor currency unit of
/// the associated bidding zone per kWh, VAT-inclusive. All points within one
/// series share the same unit and currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// EUR exchange rates needed for SEK/NOK unit conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxRates {
    pub eur_to_sek: f64,
    pub eur_to_nok: f64,
}

/// Wire shape of the FX feed response
#[derive(Debug, Deserialize)]
pub(crate) struct FxResponse {
    #[serde(default)]
    pub rates: FxQuotes,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FxQuotes {
    #[serde(rename = "SEK")]
    pub sek: Option<f64>,
    #[serde(rename = "NOK")]
    pub nok: Option<f64>,
}
