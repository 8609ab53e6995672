//! Price feed integration: fetching and normalization
//!
//! The upstream feed reports hourly (or quarter-hourly) EUR/MWh prices per
//! bidding zone. This module fetches the raw payload, converts it into the
//! canonical series used by the rest of the pipeline (local minor currency
//! unit per kWh, VAT-inclusive, sorted, deduplicated) and handles the
//! EUR->SEK/NOK FX lookup with its degrade-not-fail fallback.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::FeedClient;
pub use normalize::normalize;
pub use types::{FxRates, PricePoint};
