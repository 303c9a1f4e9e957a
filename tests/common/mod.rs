#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pokequiz_engine::providers::CatalogEntry;
use pokequiz_engine::{
    CacheSettings, CachedItemProvider, CatalogSource, Item, MemoryScoreStore, QuizEngine, QuizError,
    Result,
};

/// In-process catalog with a fixed roster
pub struct StaticCatalog {
    items: Vec<Item>,
    pub list_calls: AtomicUsize,
}

impl StaticCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn starters() -> Self {
        Self::new(vec![
            Item::new(1, "Bulbasaur", "https://img.example/1.png"),
            Item::new(4, "Charmander", "https://img.example/4.png"),
            Item::new(7, "Squirtle", "https://img.example/7.png"),
            Item::new(0, "Missingno", ""),
        ])
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list(&self, limit: usize) -> Result<Vec<CatalogEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .items
            .iter()
            .take(limit)
            .map(|item| CatalogEntry {
                name: item.name().to_string(),
                url: format!("static://{}", item.id()),
            })
            .collect())
    }

    async fn details(&self, entry: &CatalogEntry) -> Result<Item> {
        self.items
            .iter()
            .find(|item| format!("static://{}", item.id()) == entry.url)
            .cloned()
            .ok_or_else(|| QuizError::RefreshFailed(format!("no such entry {}", entry.url)))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Catalog that fails every request the way a real upstream would
pub struct DownCatalog {
    unreachable: bool,
}

impl DownCatalog {
    /// Host cannot be reached at all
    pub fn unreachable() -> Self {
        Self { unreachable: true }
    }

    /// Host answers, but with garbage
    pub fn broken() -> Self {
        Self { unreachable: false }
    }

    fn failure(&self) -> QuizError {
        if self.unreachable {
            QuizError::UpstreamUnavailable("connection refused".to_string())
        } else {
            QuizError::RefreshFailed("HTTP 503 Service Unavailable".to_string())
        }
    }
}

#[async_trait]
impl CatalogSource for DownCatalog {
    async fn list(&self, _limit: usize) -> Result<Vec<CatalogEntry>> {
        Err(self.failure())
    }

    async fn details(&self, _entry: &CatalogEntry) -> Result<Item> {
        Err(self.failure())
    }

    fn name(&self) -> &str {
        "down"
    }
}

/// Engine whose catalog never answers
pub fn down_engine(catalog: DownCatalog) -> (QuizEngine, Arc<MemoryScoreStore>) {
    let items = CachedItemProvider::new(Arc::new(catalog), CacheSettings::default());
    let scores = Arc::new(MemoryScoreStore::new());
    let engine = QuizEngine::new(Arc::new(items), scores.clone());
    (engine, scores)
}

/// Engine over the starter roster and an in-memory leaderboard
pub fn starter_engine() -> (QuizEngine, Arc<StaticCatalog>, Arc<MemoryScoreStore>) {
    let catalog = Arc::new(StaticCatalog::starters());
    let items = CachedItemProvider::new(catalog.clone(), CacheSettings::default());
    let scores = Arc::new(MemoryScoreStore::new());
    let engine = QuizEngine::new(Arc::new(items), scores.clone());
    (engine, catalog, scores)
}
