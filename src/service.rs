//! Refresh orchestration and the dashboard pipeline
//!
//! `PriceService` ties the stages together: cached series lookup with
//! staleness evaluation, upstream refresh with per-zone in-flight
//! suppression, and the resample -> partition -> optimize pipeline that
//! produces the plain-data snapshot consumed by presentation clients.
//!
//! Every stage is a pure function over its inputs; a superseded in-flight
//! refresh simply completes and its result is re-validated by the staleness
//! rules (last-writer-wins).

use crate::calendar;
use crate::config::Config;
use crate::error::{Result, SpotdashError};
use crate::feed::{FeedClient, PricePoint, normalize};
use crate::logging::get_logger;
use crate::partition;
use crate::resample::{self, Resolution};
use crate::staleness::{self, Freshness};
use crate::store::{CACHE_PREFIX, CACHE_VERSION, CachedSeries, PriceStore, cache_key};
use crate::window::{self, ChargingWindow};
use crate::zones::{self, BiddingZone};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Everything a presentation client needs for one zone at one resolution.
///
/// Consumers (chart, list, stats, recommendation views) receive this as
/// plain data and perform no normalization of their own. The window indices
/// point into `series` and are only valid for this exact snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub zone: &'static BiddingZone,
    pub resolution: Resolution,
    pub series: Vec<PricePoint>,
    pub today: Vec<PricePoint>,
    pub tomorrow: Vec<PricePoint>,
    pub future: Vec<PricePoint>,
    pub charging_window: Option<ChargingWindow>,
}

/// Price refresh and pipeline coordinator
pub struct PriceService {
    config: Config,
    client: FeedClient,
    store: Box<dyn PriceStore>,
    refresh_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    publish_tz: Tz,
    cutoff_minutes: u32,
    logger: crate::logging::StructuredLogger,
}

impl PriceService {
    /// Create a service over the given store. Fails fast on invalid
    /// configuration, including an unresolvable publication timezone.
    pub fn new(config: Config, store: Box<dyn PriceStore>) -> Result<Self> {
        config.validate()?;
        let publish_tz = calendar::resolve_timezone(&config.cache.publish_timezone)?;
        let cutoff_minutes = config.publish_cutoff_minutes()?;
        let client = FeedClient::new(&config.feed)?;
        Ok(Self {
            config,
            client,
            store,
            refresh_locks: Mutex::new(HashMap::new()),
            publish_tz,
            cutoff_minutes,
            logger: get_logger("service"),
        })
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Canonical series for a zone, served from cache while fresh
    pub async fn series_for(
        &self,
        zone_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        let zone = zones::zone_for(zone_code);
        let key = cache_key(zone.code);
        if let Some(cached) = self.store.get(&key)
            && self.freshness(&cached, now) == Freshness::Fresh
        {
            return Ok(cached.data);
        }
        self.refresh_zone(zone, now).await
    }

    /// Manual refresh: drop every cached entry for this feature (all zones,
    /// plus any legacy unprefixed key), then fetch fresh data for the zone.
    pub async fn force_refresh(
        &self,
        zone_code: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        let prefix = format!("{}:", CACHE_PREFIX);
        for key in self.store.keys() {
            if key.starts_with(&prefix) || key == CACHE_PREFIX {
                let _ = self.store.remove(&key);
            }
        }
        self.logger.info("Manual refresh: cleared price data caches");
        let zone = zones::zone_for(zone_code);
        self.refresh_zone(zone, now).await
    }

    /// Full dashboard pipeline for one zone at one display resolution
    pub async fn dashboard(
        &self,
        zone_code: Option<&str>,
        resolution: Resolution,
        now: DateTime<Utc>,
    ) -> Result<DashboardSnapshot> {
        let zone = zones::zone_for(zone_code);
        let tz = calendar::resolve_timezone(zone.timezone)?;

        let canonical = self.series_for(Some(zone.code), now).await?;
        let series = resample::at_resolution(&canonical, resolution);
        let today = partition::today(&series, now, tz);
        let tomorrow = partition::tomorrow(&series, now, tz);
        let future = partition::future(&series, now);

        // The recommendation only ever looks at future prices; a window over
        // an already-elapsed slot is meaningless.
        let ticks = self.config.charging.window_hours as usize * resolution.ticks_per_hour();
        let charging_window = match window::best_window(&future, ticks) {
            Ok(w) => map_into_series(w, &future, &series),
            Err(SpotdashError::InsufficientData { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(DashboardSnapshot {
            zone,
            resolution,
            series,
            today,
            tomorrow,
            future,
            charging_window,
        })
    }

    /// Re-evaluate staleness for every cached zone and refetch the stale
    /// ones. Driven by the background timer; failures are logged and the
    /// stale entry is retried on the next pass.
    pub async fn revalidate_cached(&self, now: DateTime<Utc>) {
        let prefix = format!("{}:", CACHE_PREFIX);
        for key in self.store.keys() {
            let Some(code) = key.strip_prefix(&prefix) else {
                continue;
            };
            let Some(cached) = self.store.get(&key) else {
                continue;
            };
            if self.freshness(&cached, now) == Freshness::Stale {
                let zone = zones::zone_for(Some(code));
                if let Err(e) = self.refresh_zone(zone, now).await {
                    self.logger
                        .warn(&format!("Background refresh failed for {}: {}", code, e));
                }
            }
        }
    }

    /// Run the periodic staleness loop until a shutdown signal arrives
    pub async fn run(&self) -> Result<()> {
        let mut ticker = interval(Duration::from_secs(self.config.cache.recheck_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.logger.info(&format!(
            "Staleness re-check every {}s, publication cutoff at minute {} ({})",
            self.config.cache.recheck_interval_secs, self.cutoff_minutes, self.config.cache.publish_timezone
        ));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.revalidate_cached(Utc::now()).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    self.logger.info("Shutdown signal received");
                    return Ok(());
                }
            }
        }
    }

    fn freshness(&self, cached: &CachedSeries, now: DateTime<Utc>) -> Freshness {
        staleness::evaluate(
            &cached.date,
            cached.fetched_at,
            now,
            self.publish_tz,
            self.cutoff_minutes,
        )
    }

    /// Refresh one zone. The per-zone lock suppresses duplicate concurrent
    /// fetches from rapid user interaction or overlapping timers; after
    /// acquiring it the cache is re-checked because a concurrent refresh may
    /// have completed while waiting.
    async fn refresh_zone(
        &self,
        zone: &'static BiddingZone,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        let lock = self.zone_lock(zone.code).await;
        let _guard = lock.lock().await;

        let key = cache_key(zone.code);
        if let Some(cached) = self.store.get(&key)
            && self.freshness(&cached, now) == Freshness::Fresh
        {
            return Ok(cached.data);
        }

        let fx = self.client.fetch_fx_rates().await;
        let payload = self.client.fetch_payload(zone.code).await?;
        let series = normalize(&payload, zone, fx, self.config.feed.vat_exclusive)?;

        let fetched_at = Utc::now();
        let entry = CachedSeries {
            data: series.clone(),
            date: calendar::local_date_string(fetched_at, self.publish_tz),
            fetched_at,
            version: CACHE_VERSION,
        };
        if let Err(e) = self.store.set(&key, entry) {
            // A broken cache write only costs an extra fetch later
            self.logger
                .warn(&format!("Failed to cache series for {}: {}", zone.code, e));
        }
        self.logger.info(&format!(
            "Refreshed {} price point(s) for zone {}",
            series.len(),
            zone.code
        ));
        Ok(series)
    }

    async fn zone_lock(&self, code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.refresh_locks.lock().await;
        locks
            .entry(code.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn map_into_series(
    w: ChargingWindow,
    future: &[PricePoint],
    series: &[PricePoint],
) -> Option<ChargingWindow> {
    let start_ts = future.get(w.start_index)?.timestamp;
    let end_ts = future.get(w.end_index)?.timestamp;
    let start_index = series.iter().position(|p| p.timestamp == start_ts)?;
    let end_index = series.iter().position(|p| p.timestamp == end_ts)?;
    Some(ChargingWindow {
        start_index,
        end_index,
        average_price: w.average_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration as ChronoDuration;

    fn fresh_entry(now: DateTime<Utc>, tz: Tz, prices: &[f64]) -> CachedSeries {
        let data: Vec<PricePoint> = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: now + ChronoDuration::hours(i as i64),
                price,
            })
            .collect();
        CachedSeries {
            data,
            date: calendar::local_date_string(now, tz),
            fetched_at: now,
            version: CACHE_VERSION,
        }
    }

    fn service_with_cached(prices: &[f64], now: DateTime<Utc>) -> PriceService {
        let config = Config::default();
        let tz = calendar::resolve_timezone(&config.cache.publish_timezone).unwrap();
        let store = MemoryStore::new();
        store
            .set(&cache_key("FI"), fresh_entry(now, tz, prices))
            .unwrap();
        PriceService::new(config, Box::new(store)).unwrap()
    }

    #[tokio::test]
    async fn fresh_cache_is_served_without_fetching() {
        let now = Utc::now();
        // The default feed URLs are unreachable from tests; a fresh cache
        // entry must satisfy the request without any network traffic.
        let svc = service_with_cached(&[1.0, 2.0, 3.0], now);
        let series = svc.series_for(Some("FI"), now).await.unwrap();
        assert_eq!(series.len(), 3);
    }

    #[tokio::test]
    async fn dashboard_builds_all_partitions_and_a_window() {
        let now = Utc::now();
        let prices: Vec<f64> = (0..30).map(|i| f64::from(i % 7) + 1.0).collect();
        let svc = service_with_cached(&prices, now);

        let snap = svc
            .dashboard(Some("FI"), Resolution::Hourly, now)
            .await
            .unwrap();
        assert_eq!(snap.zone.code, "FI");
        assert!(!snap.series.is_empty());
        assert!(!snap.future.is_empty());

        let w = snap.charging_window.unwrap();
        assert_eq!(w.end_index - w.start_index + 1, 4);
        // Window indices must be valid in the resampled series
        assert!(w.end_index < snap.series.len());
    }

    #[tokio::test]
    async fn dashboard_window_is_none_on_insufficient_future_data() {
        let now = Utc::now();
        let svc = service_with_cached(&[1.0, 2.0], now);
        let snap = svc
            .dashboard(Some("FI"), Resolution::Hourly, now)
            .await
            .unwrap();
        assert!(snap.charging_window.is_none());
    }

    #[tokio::test]
    async fn fifteen_min_window_uses_sixteen_ticks() {
        let now = Utc::now();
        let prices: Vec<f64> = (0..30).map(|i| f64::from(i % 5) + 1.0).collect();
        let svc = service_with_cached(&prices, now);
        let snap = svc
            .dashboard(Some("FI"), Resolution::FifteenMin, now)
            .await
            .unwrap();
        if let Some(w) = snap.charging_window {
            assert_eq!(w.end_index - w.start_index + 1, 16);
        } else {
            panic!("expected a charging window over 30 hours of data");
        }
    }

    #[tokio::test]
    async fn unknown_zone_falls_back_to_default() {
        let now = Utc::now();
        let svc = service_with_cached(&[1.0, 2.0, 3.0], now);
        let series = svc.series_for(Some("XX"), now).await.unwrap();
        assert_eq!(series.len(), 3);
    }
}
