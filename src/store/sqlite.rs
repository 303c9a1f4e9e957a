use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::ScoreRecord;
use crate::error::{QuizError, Result};
use crate::store::{ScoreStats, ScoreStore};

/// SQLite-backed leaderboard
///
/// Schema:
/// ```sql
/// CREATE TABLE scores (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     score INTEGER NOT NULL,
///     played_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteScoreStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteScoreStore {
    /// Open (or create) the store at `db_path`; `:memory:` is accepted
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                played_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_score ON scores(score DESC)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| QuizError::Persistence("score store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn save(&self, record: &ScoreRecord) -> Result<()> {
        if record.name.trim().is_empty() {
            return Err(QuizError::Validation("score record has no player name".to_string()));
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO scores (name, score, played_at) VALUES (?1, ?2, ?3)",
            params![record.name, record.score, Utc::now().to_rfc3339()],
        )
        .map_err(|e| {
            tracing::error!("Failed to save score for {}: {}", record.name, e);
            QuizError::Database(e)
        })?;

        tracing::info!("Score saved: {} ({} pts)", record.name, record.score);
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>> {
        let conn = self.lock()?;

        // Ties keep insertion order
        let mut stmt = conn
            .prepare("SELECT name, score FROM scores ORDER BY score DESC, id ASC LIMIT ?1")?;

        let records = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ScoreRecord {
                    name: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if records.is_empty() {
            return Err(QuizError::NotFound("no scores recorded yet".to_string()));
        }

        tracing::debug!("Loaded {} scores", records.len());
        Ok(records)
    }

    async fn stats(&self) -> Result<ScoreStats> {
        let conn = self.lock()?;

        let (total_games, best_score, last_played): (u64, Option<u32>, Option<String>) = conn
            .query_row(
                "SELECT COUNT(*), MAX(score), MAX(played_at) FROM scores",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        let last_played = last_played.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        });

        Ok(ScoreStats {
            total_games,
            best_score,
            last_played,
        })
    }
}
