//! Cached series persistence
//!
//! The pipeline depends on an injected key-value capability rather than any
//! concrete global storage. Entries are schema-versioned; anything written
//! by an older schema is treated as absent and removed on read.

use crate::error::Result;
use crate::feed::PricePoint;
use crate::logging::get_logger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Current cache schema version; entries below this are invalidated wholesale
pub const CACHE_VERSION: u32 = 4;

/// Key prefix for per-zone cache entries
pub const CACHE_PREFIX: &str = "spot_prices";

/// Cache key for a bidding zone
pub fn cache_key(zone_code: &str) -> String {
    format!("{}:{}", CACHE_PREFIX, zone_code)
}

/// One cached canonical series for a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSeries {
    /// The canonical series as fetched and normalized
    pub data: Vec<PricePoint>,

    /// Calendar date at fetch time in the provider's publication timezone
    pub date: String,

    /// Instant the fetch completed
    pub fetched_at: DateTime<Utc>,

    /// Schema version the entry was written with
    pub version: u32,
}

/// Injected key-value storage capability for cached series
pub trait PriceStore: Send + Sync {
    /// Read an entry; entries below the current schema version are removed
    /// and reported as absent
    fn get(&self, key: &str) -> Option<CachedSeries>;

    /// Write an entry
    fn set(&self, key: &str, entry: CachedSeries) -> Result<()>;

    /// Remove an entry
    fn remove(&self, key: &str) -> Result<()>;

    /// All present keys
    fn keys(&self) -> Vec<String>;
}

/// In-memory store, used in tests and when no cache file is configured
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CachedSeries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PriceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<CachedSeries> {
        {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some(entry) if entry.version >= CACHE_VERSION => return Some(entry.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Entry written by an older schema: invalidate wholesale
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, entry: CachedSeries) -> Result<()> {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), entry);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// File-backed store: the whole key space is one JSON document, loaded at
/// startup and rewritten after every mutation (best effort)
pub struct JsonFileStore {
    file_path: PathBuf,
    entries: RwLock<HashMap<String, CachedSeries>>,
    logger: crate::logging::StructuredLogger,
}

impl JsonFileStore {
    /// Create a store backed by the given file, loading existing contents
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let logger = get_logger("store");
        let path = file_path.as_ref().to_path_buf();
        let entries = Self::load_from(&path, &logger);
        Self {
            file_path: path,
            entries: RwLock::new(entries),
            logger,
        }
    }

    fn load_from(
        path: &Path,
        logger: &crate::logging::StructuredLogger,
    ) -> HashMap<String, CachedSeries> {
        if !path.exists() {
            logger.info("No cache file found, starting empty");
            return HashMap::new();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => {
                    logger.info("Loaded cached series from disk");
                    map
                }
                Err(e) => {
                    logger.warn(&format!("Discarding unreadable cache file: {}", e));
                    HashMap::new()
                }
            },
            Err(e) => {
                logger.warn(&format!("Failed to read cache file: {}", e));
                HashMap::new()
            }
        }
    }

    fn persist(&self) -> Result<()> {
        let snapshot = self
            .entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default();
        let contents = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.file_path, contents)?;
        self.logger.debug("Saved cache to disk");
        Ok(())
    }
}

impl PriceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<CachedSeries> {
        {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some(entry) if entry.version >= CACHE_VERSION => return Some(entry.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.logger.info("Old cache schema detected, clearing entry");
        let _ = self.remove(key);
        None
    }

    fn set(&self, key: &str, entry: CachedSeries) -> Result<()> {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), entry);
        }
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<()> {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
        self.persist()
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}
