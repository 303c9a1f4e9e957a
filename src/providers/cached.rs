use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use rand::Rng;
use std::sync::{Arc, RwLock};

use crate::core::Item;
use crate::error::{QuizError, Result};
use crate::providers::{CatalogSource, ItemProvider};

/// Tuning for the item cache
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Age after which the cache is rebuilt on the next draw
    pub ttl: Duration,
    /// Number of catalog entries fetched per refresh
    pub max_size: usize,
    /// Detail requests in flight during a refresh
    pub fetch_concurrency: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(24),
            max_size: 1000,
            fetch_concurrency: 16,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    items: Vec<Item>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match self.refreshed_at {
            Some(at) => !self.items.is_empty() && now - at <= ttl,
            None => false,
        }
    }
}

/// Item provider backed by a time-limited in-process cache of a remote catalog.
///
/// A refresh is all-or-nothing: the full listing and every detail request must
/// succeed, items without an image are dropped, and the cache is swapped in one
/// write. The lock is never held across a fetch, so two callers hitting a cold
/// cache at the same time may both refresh; the last write wins.
pub struct CachedItemProvider {
    catalog: Arc<dyn CatalogSource>,
    settings: CacheSettings,
    state: RwLock<CacheState>,
}

impl CachedItemProvider {
    pub fn new(catalog: Arc<dyn CatalogSource>, settings: CacheSettings) -> Self {
        Self {
            catalog,
            settings,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Number of cached items
    pub fn cache_size(&self) -> Result<usize> {
        Ok(self.read_state()?.items.len())
    }

    /// Time of the last successful refresh
    pub fn refreshed_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read_state()?.refreshed_at)
    }

    /// Drop cached items; the next draw refreshes
    pub fn invalidate(&self) -> Result<()> {
        *self.write_state()? = CacheState::default();
        Ok(())
    }

    /// Rebuild the cache from the catalog
    pub async fn refresh(&self) -> Result<usize> {
        let items = self.fetch_items().await?;
        let count = items.len();
        self.replace(items)?;

        Ok(count)
    }

    /// Swap in a freshly fetched item list and draw one item from it
    fn replace_and_pick(&self, items: Vec<Item>) -> Result<Option<Item>> {
        let picked = Self::pick(&items);
        self.replace(items)?;
        Ok(picked)
    }

    fn replace(&self, items: Vec<Item>) -> Result<()> {
        let count = items.len();
        {
            let mut state = self.write_state()?;
            state.items = items;
            state.refreshed_at = Some(Utc::now());
        }

        tracing::info!("Item cache refreshed from {} ({} items)", self.catalog.name(), count);
        Ok(())
    }

    async fn fetch_items(&self) -> Result<Vec<Item>> {
        let mut entries = self
            .catalog
            .list(self.settings.max_size)
            .await
            .map_err(Self::as_refresh_error)?;
        entries.truncate(self.settings.max_size);

        let fetched: Vec<Item> = stream::iter(entries.into_iter().map(|entry| {
            let catalog = Arc::clone(&self.catalog);
            async move { catalog.details(&entry).await }
        }))
        .buffered(self.settings.fetch_concurrency.max(1))
        .try_collect()
        .await
        .map_err(Self::as_refresh_error)?;

        let total = fetched.len();
        let items: Vec<Item> = fetched.into_iter().filter(Item::has_image).collect();

        if total != items.len() {
            tracing::debug!("Dropped {} catalog entries without image", total - items.len());
        }

        if items.is_empty() {
            return Err(QuizError::RefreshFailed(
                "no valid items found in catalog".to_string(),
            ));
        }

        Ok(items)
    }

    /// Keep the two catalog failure kinds, fold anything else into a refresh failure
    fn as_refresh_error(err: QuizError) -> QuizError {
        match err {
            QuizError::UpstreamUnavailable(_) | QuizError::RefreshFailed(_) => err,
            other => QuizError::RefreshFailed(other.to_string()),
        }
    }

    fn pick(items: &[Item]) -> Option<Item> {
        if items.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..items.len());
        Some(items[index].clone())
    }

    fn pick_fresh(&self) -> Result<Option<Item>> {
        let state = self.read_state()?;
        if state.is_fresh(self.settings.ttl, Utc::now()) {
            Ok(Self::pick(&state.items))
        } else {
            Ok(None)
        }
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, CacheState>> {
        self.state
            .read()
            .map_err(|_| QuizError::Other("item cache lock poisoned".to_string()))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, CacheState>> {
        self.state
            .write()
            .map_err(|_| QuizError::Other("item cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl ItemProvider for CachedItemProvider {
    async fn random_item(&self) -> Result<Item> {
        if let Some(item) = self.pick_fresh()? {
            return Ok(item);
        }

        let items = match self.fetch_items().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Item cache refresh failed: {}", e);
                return Err(e);
            }
        };

        self.replace_and_pick(items)?
            .ok_or_else(|| QuizError::RefreshFailed("item cache empty after refresh".to_string()))
    }

    fn name(&self) -> &str {
        self.catalog.name()
    }
}
