use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

use crate::core::{rank_descending, ScoreRecord};
use crate::error::{QuizError, Result};
use crate::store::{ScoreStats, ScoreStore};

/// Non-persistent leaderboard, append-only
#[derive(Default)]
pub struct MemoryScoreStore {
    records: Mutex<Vec<(ScoreRecord, DateTime<Utc>)>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<(ScoreRecord, DateTime<Utc>)>>> {
        self.records
            .lock()
            .map_err(|_| QuizError::Persistence("score store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn save(&self, record: &ScoreRecord) -> Result<()> {
        self.lock()?.push((record.clone(), Utc::now()));
        tracing::info!("Score saved: {} ({} pts)", record.name, record.score);
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>> {
        let mut records: Vec<ScoreRecord> =
            self.lock()?.iter().map(|(record, _)| record.clone()).collect();

        if records.is_empty() {
            return Err(QuizError::NotFound("no scores recorded yet".to_string()));
        }

        rank_descending(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    async fn stats(&self) -> Result<ScoreStats> {
        let records = self.lock()?;
        Ok(ScoreStats {
            total_games: records.len() as u64,
            best_score: records.iter().map(|(r, _)| r.score).max(),
            last_played: records.iter().map(|(_, at)| *at).max(),
        })
    }
}
