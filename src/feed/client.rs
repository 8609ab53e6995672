//! HTTP client for the price and FX feeds

use crate::config::FeedConfig;
use crate::error::{Result, SpotdashError};
use crate::feed::types::{FxRates, FxResponse};
use crate::logging::get_logger;
use reqwest::header::{ACCEPT, CACHE_CONTROL, USER_AGENT};

/// Client for the upstream price provider and the FX rate feed
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    fx_url: String,
    fallback: FxRates,
    logger: crate::logging::StructuredLogger,
}

impl FeedClient {
    /// Build a client from feed configuration
    pub fn new(cfg: &FeedConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            fx_url: cfg.fx_url.clone(),
            fallback: FxRates {
                eur_to_sek: cfg.fallback_eur_to_sek,
                eur_to_nok: cfg.fallback_eur_to_nok,
            },
            logger: get_logger("feed"),
        })
    }

    /// Fetch the raw price payload for a zone.
    ///
    /// Requests are sent with a no-cache directive; staleness is governed
    /// entirely by the explicit cache state machine, so no intermediate
    /// layer may serve a stale response transparently.
    pub async fn fetch_payload(&self, zone_code: &str) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, zone_code);
        self.logger
            .debug(&format!("Fetching price payload from {}", url));

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(USER_AGENT, "spotdash/1.0 (+https://github.com/)")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SpotdashError::network(format!(
                "Price feed returned {} for zone {}",
                resp.status(),
                zone_code
            )));
        }

        let payload: serde_json::Value = resp.json().await?;
        Ok(payload)
    }

    /// Fetch EUR->SEK/NOK rates; any failure degrades to the configured
    /// fallback rates since stale FX is better than no price data.
    pub async fn fetch_fx_rates(&self) -> FxRates {
        match self.try_fetch_fx_rates().await {
            Ok(rates) => rates,
            Err(e) => {
                self.logger.warn(&format!(
                    "FX lookup failed ({}), using fallback rates SEK={} NOK={}",
                    e, self.fallback.eur_to_sek, self.fallback.eur_to_nok
                ));
                self.fallback
            }
        }
    }

    async fn try_fetch_fx_rates(&self) -> Result<FxRates> {
        let resp = self
            .http
            .get(&self.fx_url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SpotdashError::network(format!(
                "FX feed returned {}",
                resp.status()
            )));
        }

        let body: FxResponse = resp.json().await?;
        Ok(FxRates {
            eur_to_sek: body.rates.sek.unwrap_or(self.fallback.eur_to_sek),
            eur_to_nok: body.rates.nok.unwrap_or(self.fallback.eur_to_nok),
        })
    }

    /// Fallback rates configured for this client
    pub fn fallback_rates(&self) -> FxRates {
        self.fallback
    }
}
