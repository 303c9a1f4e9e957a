//! # PokeQuiz Engine
//!
//! Creature trivia quiz: guess the name of a randomly drawn creature from its
//! picture, earn a point per correct answer, lose one of three lives per wrong
//! answer. Finished games land on a leaderboard.
//!
//! - Item catalog cached in-process with time-based refresh (PokéAPI by default)
//! - SQLite or in-memory score store
//! - Async/await architecture
//! - Interfaces: Rust library, HTTP API (`server` feature), terminal client (`cli` feature)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pokequiz_engine::{CacheSettings, CachedItemProvider, PokeApiCatalog, QuizEngine, SqliteScoreStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = PokeApiCatalog::new("https://pokeapi.co/api/v2/pokemon", Duration::from_secs(10))?;
//!     let items = CachedItemProvider::new(Arc::new(catalog), CacheSettings::default());
//!     let scores = SqliteScoreStore::new("pokequiz.db").await?;
//!     let engine = QuizEngine::new(Arc::new(items), Arc::new(scores));
//!
//!     let game = engine.start_game("Ash").await?;
//!     println!("Who's that? {}", game.current_item.image_url());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod providers;
pub mod store;

#[cfg(feature = "server")]
pub mod http;

// Re-export primary types
pub use config::QuizConfig;
pub use self::core::{Item, PlayerName, ScoreRecord, Session, SessionState};
pub use engine::{AnswerOutcome, GameStart, QuizEngine};
pub use error::{ErrorKind, QuizError, Result};
pub use providers::{CacheSettings, CachedItemProvider, CatalogSource, ItemProvider, PokeApiCatalog};
pub use store::{MemoryScoreStore, ScoreStore, SqliteScoreStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
