//! Configuration management for Spotdash
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{Result, SpotdashError};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Web server binding configuration
    pub web: WebConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Upstream price and FX feed configuration
    pub feed: FeedConfig,

    /// Local series cache and staleness configuration
    pub cache: CacheConfig,

    /// Charging window recommendation configuration
    pub charging: ChargingConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (or directory for rotated files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Upstream feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the price feed; the zone code is appended per request
    pub base_url: String,

    /// URL of the EUR base FX rate feed
    pub fx_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Whether the upstream feed reports VAT-exclusive prices. When true the
    /// zone-specific VAT multiplier is applied during normalization.
    #[serde(default = "default_true")]
    pub vat_exclusive: bool,

    /// Fallback EUR -> SEK rate used when the FX feed is unavailable
    pub fallback_eur_to_sek: f64,

    /// Fallback EUR -> NOK rate used when the FX feed is unavailable
    pub fallback_eur_to_nok: f64,
}

/// Cache and staleness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the JSON cache file; empty means in-memory only
    pub file: String,

    /// IANA timezone in which the provider publishes day-ahead prices
    pub publish_timezone: String,

    /// Daily publication cutoff in HH:MM, provider-local wall clock
    pub publish_cutoff: String,

    /// Interval in seconds between background staleness re-evaluations
    pub recheck_interval_secs: u64,
}

/// Charging window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingConfig {
    /// Length of the recommended charging window in hours
    pub window_hours: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8088,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/spotdash.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mainnet.srcful.dev/price/electricity".to_string(),
            fx_url: "https://api.exchangerate.host/latest?base=EUR&symbols=SEK,NOK".to_string(),
            timeout_secs: 10,
            vat_exclusive: true,
            fallback_eur_to_sek: 11.0,
            fallback_eur_to_nok: 11.0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: "/data/spotdash_cache.json".to_string(),
            publish_timezone: "Europe/Helsinki".to_string(),
            publish_cutoff: "14:20".to_string(),
            recheck_interval_secs: 300,
        }
    }
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self { window_hours: 4 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
            feed: FeedConfig::default(),
            cache: CacheConfig::default(),
            charging: ChargingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with validation
    pub fn load() -> Result<Self> {
        // Try to load from default locations
        let default_paths = [
            "spotdash_config.yaml",
            "/data/spotdash_config.yaml",
            "/etc/spotdash/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse the publication cutoff into minutes after provider-local midnight
    pub fn publish_cutoff_minutes(&self) -> Result<u32> {
        parse_hhmm(&self.cache.publish_cutoff)
            .ok_or_else(|| SpotdashError::validation("cache.publish_cutoff", "Expected HH:MM"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.web.port == 0 {
            return Err(SpotdashError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        if self.feed.base_url.is_empty() {
            return Err(SpotdashError::validation(
                "feed.base_url",
                "Feed URL cannot be empty",
            ));
        }

        if self.feed.timeout_secs == 0 {
            return Err(SpotdashError::validation(
                "feed.timeout_secs",
                "Must be greater than 0",
            ));
        }

        if self.feed.fallback_eur_to_sek <= 0.0 || self.feed.fallback_eur_to_nok <= 0.0 {
            return Err(SpotdashError::validation(
                "feed.fallback_rates",
                "Fallback FX rates must be positive",
            ));
        }

        // An unknown publication timezone would corrupt every staleness
        // decision, so it is rejected here rather than defaulted later.
        crate::calendar::resolve_timezone(&self.cache.publish_timezone)?;

        self.publish_cutoff_minutes()?;

        if self.cache.recheck_interval_secs == 0 {
            return Err(SpotdashError::validation(
                "cache.recheck_interval_secs",
                "Must be greater than 0",
            ));
        }

        if self.charging.window_hours == 0 {
            return Err(SpotdashError::validation(
                "charging.window_hours",
                "Must be at least 1",
            ));
        }

        Ok(())
    }
}

fn parse_hhmm(s: &str) -> Option<u32> {
    let (hh, mm) = s.split_once(':')?;
    let hours: u32 = hh.parse().ok()?;
    let minutes: u32 = mm.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}
