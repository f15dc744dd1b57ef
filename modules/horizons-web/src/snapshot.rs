//! Per-host data dumps, loaded once and kept in memory.
//!
//! A dump lives at `{dump_dir}/{dump_key}.json`; the root dashboard uses
//! `ALL.json`. Before caching, amounts are brought into the host currency and
//! categories are derived when the dump ships none.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use horizons_common::{Category, Collective, HorizonsError, HostConfig, Snapshot};
use horizons_pipeline::{
    derive_categories, normalize_currency, with_all_first, CurrencyPolicy, StaticRates, TagPolicy,
};
use tokio::sync::RwLock;
use tracing::info;

/// A host's snapshot ready for `compute`.
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub collectives: Vec<Collective>,
    /// `ALL` first.
    pub categories: Vec<Category>,
    pub policy: TagPolicy,
}

impl LoadedSnapshot {
    /// Normalize currencies and settle the category list for `host`.
    pub fn prepare(
        host: &HostConfig,
        snapshot: Snapshot,
        as_of_year: i32,
    ) -> Result<Self, HorizonsError> {
        let policy = TagPolicy::from_host(host);
        let rates = StaticRates::from_config(&host.rates);
        let currency_policy = if rates.is_empty() {
            CurrencyPolicy::Strict
        } else {
            CurrencyPolicy::Convert {
                rates: &rates,
                as_of_year,
            }
        };

        let collectives =
            normalize_currency(&snapshot.collectives, &host.currency, &currency_policy)?
                .into_owned();

        let categories = if snapshot.categories.is_empty() {
            derive_categories(&collectives, &policy, &host.palette, &host.all_color)
        } else {
            with_all_first(&snapshot.categories, &host.all_color)
        };

        Ok(Self {
            collectives,
            categories,
            policy,
        })
    }
}

/// A prepared snapshot and the year its conversion rates were applied for.
struct CachedSnapshot {
    as_of_year: i32,
    loaded: Arc<LoadedSnapshot>,
}

pub struct SnapshotStore {
    dump_dir: PathBuf,
    cache: RwLock<HashMap<String, CachedSnapshot>>,
}

impl SnapshotStore {
    pub fn new(dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_dir: dump_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn path_for(&self, host: &HostConfig) -> PathBuf {
        self.dump_dir.join(format!("{}.json", host.dump_key()))
    }

    /// The prepared snapshot for `host`, read from disk on first use and
    /// again once `as_of_year` moves past the cached one.
    ///
    /// The dump is read and prepared without holding the cache lock.
    pub async fn get(
        &self,
        host: &HostConfig,
        as_of_year: i32,
    ) -> Result<Arc<LoadedSnapshot>, HorizonsError> {
        let key = host.dump_key().to_string();
        if let Some(hit) = self.cache.read().await.get(&key) {
            if hit.as_of_year == as_of_year {
                return Ok(hit.loaded.clone());
            }
        }

        let path = self.path_for(host);
        let snapshot = read_snapshot(&path, &key).await?;
        let loaded = Arc::new(LoadedSnapshot::prepare(host, snapshot, as_of_year)?);

        let mut cache = self.cache.write().await;
        // A concurrent request may have loaded the same year first.
        if let Some(hit) = cache.get(&key) {
            if hit.as_of_year == as_of_year {
                return Ok(hit.loaded.clone());
            }
        }
        info!(
            host = %key,
            as_of_year,
            collectives = loaded.collectives.len(),
            categories = loaded.categories.len(),
            "Snapshot loaded"
        );
        cache.insert(
            key,
            CachedSnapshot {
                as_of_year,
                loaded: loaded.clone(),
            },
        );
        Ok(loaded)
    }
}

pub async fn read_snapshot(path: &Path, key: &str) -> Result<Snapshot, HorizonsError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(HorizonsError::SnapshotNotFound(key.to_string()));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to read snapshot: {}", path.display()))
                .into());
        }
    };
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
    Ok(snapshot)
}
