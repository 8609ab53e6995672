//! # Spotdash - Nordic Spot Price Dashboard Backend
//!
//! A Rust backend for a browser dashboard over Nordic day-ahead electricity
//! spot prices, with cached upstream fetching, resolution resampling,
//! DST-correct local-day partitioning, and a cheapest contiguous charging
//! window recommendation for EV owners.
//!
//! ## Architecture
//!
//! The application follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `calendar`: Timezone-aware calendar helpers
//! - `zones`: Bidding zone table (currency, timezone, VAT)
//! - `feed`: Upstream price and FX feed client plus payload normalization
//! - `resample`: Hourly/15-minute resolution conversion
//! - `partition`: Today/tomorrow/future local-day partitioning
//! - `window`: Cheapest contiguous charging window search
//! - `staleness`: Publication-cutoff cache freshness rules
//! - `store`: Injected key-value persistence for cached series
//! - `service`: Refresh orchestration and the dashboard pipeline
//! - `web`: HTTP server and REST API

pub mod calendar;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod partition;
pub mod resample;
pub mod service;
pub mod staleness;
pub mod store;
pub mod web;
pub mod window;
pub mod zones;


// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SpotdashError};
pub use service::{DashboardSnapshot, PriceService};
