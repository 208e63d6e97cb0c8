//! On-disk cache of API responses used by the CLI's `--fast` mode.
//!
//! The whole cache shares one timestamp, refreshed on every write. Once it is
//! older than [`CACHE_TTL_MS`] it loads as empty.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::runtime::Runtime;

/// Cache file name, placed in the user's home directory.
pub const CACHE_FILE_NAME: &str = ".ocx_cache.json";

/// Cache lifetime: 15 minutes.
pub const CACHE_TTL_MS: u64 = 15 * 60 * 1000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Cache {
    /// Milliseconds since the Unix epoch of the last write.
    #[serde(default)]
    pub timestamp: u64,
    /// Last `/rates` response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<Value>,
    /// Last `/currencies` response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currencies: Option<Value>,
    /// `/history` responses keyed by [`history_key`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub history: BTreeMap<String, Value>,
}

impl Cache {
    /// `~/.ocx_cache.json`, if the home directory is known.
    pub fn default_path<R: Runtime>(runtime: &R) -> Option<PathBuf> {
        runtime.home_dir().map(|home| home.join(CACHE_FILE_NAME))
    }

    /// Loads the cache at `path`. A missing, unreadable, malformed or expired
    /// file loads as an empty cache.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path, now_ms: u64) -> Self {
        if !runtime.exists(path) {
            return Self::default();
        }

        match Self::read(runtime, path) {
            Ok(cache) if cache.is_fresh(now_ms) => cache,
            Ok(cache) => {
                debug!(
                    "Ignoring expired cache {:?} (written at {})",
                    path, cache.timestamp
                );
                Self::default()
            }
            Err(e) => {
                debug!("Ignoring unreadable cache {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    fn read<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content).context("Failed to parse cache file")
    }

    /// Stamps the cache with `now_ms` and writes it to `path`.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&mut self, runtime: &R, path: &Path, now_ms: u64) -> Result<()> {
        self.timestamp = now_ms;
        let content = serde_json::to_string(self).context("Failed to serialize cache")?;
        runtime.write(path, content.as_bytes())
    }

    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) < CACHE_TTL_MS
    }

    /// The `rates` object of the cached `/rates` response.
    pub fn rate_table(&self) -> Option<&Map<String, Value>> {
        self.rates.as_ref()?.get("rates")?.as_object()
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rate_table()?.get(code)?.as_f64()
    }

    /// Cached currencies, unless the mapping is empty.
    pub fn currency_table(&self) -> Option<&Map<String, Value>> {
        self.currencies
            .as_ref()?
            .as_object()
            .filter(|table| !table.is_empty())
    }

    pub fn history_entry(&self, base: &str, date: &str) -> Option<&Value> {
        self.history.get(&history_key(base, date))
    }

    pub fn insert_history(&mut self, base: &str, date: &str, response: Value) {
        self.history.insert(history_key(base, date), response);
    }
}

pub fn history_key(base: &str, date: &str) -> String {
    format!("{}_{}", base, date)
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
