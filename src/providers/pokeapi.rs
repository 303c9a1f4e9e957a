use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::core::Item;
use crate::error::{QuizError, Result};
use crate::providers::{CatalogEntry, CatalogSource};

/// Default PokéAPI listing endpoint
pub const DEFAULT_POKEAPI_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// PokéAPI catalog client
pub struct PokeApiCatalog {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct PokemonDetails {
    id: i64,
    name: String,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Debug, Deserialize, Default)]
struct Sprites {
    #[serde(default)]
    front_default: Option<String>,
}

impl PokeApiCatalog {
    /// Create new PokéAPI client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Unreachable host vs. everything else
    fn classify(context: &str, err: reqwest::Error) -> QuizError {
        if err.is_connect() {
            QuizError::UpstreamUnavailable(format!("{}: {}", context, err))
        } else {
            QuizError::RefreshFailed(format!("{}: {}", context, err))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, context: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify(context, e))?;

        if !response.status().is_success() {
            return Err(QuizError::RefreshFailed(format!(
                "{}: HTTP {}",
                context,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| QuizError::RefreshFailed(format!("{}: invalid JSON: {}", context, e)))
    }
}

#[async_trait]
impl CatalogSource for PokeApiCatalog {
    async fn list(&self, limit: usize) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}?limit={}", self.base_url, limit);
        let listing: ListResponse = self.get_json(&url, "listing request failed").await?;

        Ok(listing.results)
    }

    async fn details(&self, entry: &CatalogEntry) -> Result<Item> {
        let details: PokemonDetails = self
            .get_json(&entry.url, "details request failed")
            .await?;

        Ok(Item::new(
            details.id,
            details.name,
            details.sprites.front_default.unwrap_or_default(),
        ))
    }

    fn name(&self) -> &str {
        "pokeapi"
    }
}
