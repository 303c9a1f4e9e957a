pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::core::ScoreRecord;
use crate::error::Result;

pub use memory::MemoryScoreStore;
pub use sqlite::SqliteScoreStore;

/// Default leaderboard length
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Trait for leaderboard persistence
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Append a finished session's score. Repeated names create repeated rows.
    async fn save(&self, record: &ScoreRecord) -> Result<()>;

    /// Best `limit` scores, highest first.
    ///
    /// Fails with `QuizError::NotFound` when nothing has been recorded yet.
    async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>>;

    /// Leaderboard statistics
    async fn stats(&self) -> Result<ScoreStats>;
}

/// Leaderboard statistics
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ScoreStats {
    pub total_games: u64,
    pub best_score: Option<u32>,
    pub last_played: Option<chrono::DateTime<chrono::Utc>>,
}
