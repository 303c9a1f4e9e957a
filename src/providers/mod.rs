pub mod cached;
pub mod pokeapi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Item;
use crate::error::Result;

pub use cached::{CacheSettings, CachedItemProvider};
pub use pokeapi::PokeApiCatalog;

/// Source of quiz items, as seen by the game use cases
#[async_trait]
pub trait ItemProvider: Send + Sync {
    /// Draw one item uniformly at random
    async fn random_item(&self) -> Result<Item>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Reference to an item in a remote catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// Raw access to a remote item catalog (PokéAPI and friends)
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch up to `limit` entries from the catalog listing
    async fn list(&self, limit: usize) -> Result<Vec<CatalogEntry>>;

    /// Fetch full details of a single entry.
    ///
    /// The returned item may lack an image; callers decide what to do with it.
    async fn details(&self, entry: &CatalogEntry) -> Result<Item>;

    /// Get catalog name
    fn name(&self) -> &str;
}
