use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{rank_descending, Item, ScoreRecord, Session};
use crate::error::{QuizError, Result};
use crate::providers::ItemProvider;
use crate::store::ScoreStore;

/// Redraws allowed after the first draw when avoiding a repeat of the previous item
pub const MAX_REDRAWS: usize = 5;

/// A freshly started game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    pub player_name: String,
    pub score: u32,
    pub lives: u8,
    pub current_item: Item,
}

/// Outcome of one submitted answer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub score: u32,
    pub lives: u8,
    pub is_over: bool,
    /// Next item to guess; `None` once the game is over
    pub current_item: Option<Item>,
    /// Revealed only after a wrong answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Quiz orchestrator: wires the item provider and the score store into the game rules
pub struct QuizEngine {
    items: Arc<dyn ItemProvider>,
    scores: Arc<dyn ScoreStore>,
}

impl QuizEngine {
    pub fn new(items: Arc<dyn ItemProvider>, scores: Arc<dyn ScoreStore>) -> Self {
        Self { items, scores }
    }

    /// Validate the player name, open a session and draw the first item
    pub async fn start_game(&self, player_name: &str) -> Result<GameStart> {
        let session = Session::new(player_name)?;
        let current_item = self.items.random_item().await.map_err(upstream)?;

        tracing::debug!("Game started for {}", session.player_name());

        Ok(GameStart {
            player_name: session.player_name().to_string(),
            score: session.score(),
            lives: session.lives(),
            current_item,
        })
    }

    /// Score one answer against the current item.
    ///
    /// A correct answer (trimmed, case-insensitive) earns a point; a wrong one costs a
    /// life and reveals the expected name. When the last life goes, the final score is
    /// saved exactly once and no further item is drawn. A session that is already
    /// over is rejected untouched.
    pub async fn submit_answer(
        &self,
        session: &mut Session,
        current_item: &Item,
        answer: &str,
    ) -> Result<AnswerOutcome> {
        if session.is_over() {
            return Err(QuizError::Validation("game is already over".to_string()));
        }

        let correct = current_item.matches_answer(answer);

        if correct {
            session.add_point();
        } else {
            session.lose_life();
        }

        let correct_answer = (!correct).then(|| current_item.name().to_string());

        if session.is_over() {
            self.scores.save(&ScoreRecord::from(&*session)).await.map_err(|e| {
                tracing::error!("Failed to save final score of {}: {}", session.player_name(), e);
                match e {
                    QuizError::Persistence(_) | QuizError::Database(_) => e,
                    other => QuizError::Persistence(other.to_string()),
                }
            })?;

            return Ok(AnswerOutcome {
                score: session.score(),
                lives: session.lives(),
                is_over: true,
                current_item: None,
                correct_answer,
            });
        }

        let next = self.items.random_item().await.map_err(upstream)?;

        Ok(AnswerOutcome {
            score: session.score(),
            lives: session.lives(),
            is_over: false,
            current_item: Some(next),
            correct_answer,
        })
    }

    /// Draw an item, trying not to repeat `previous`.
    ///
    /// Redraws at most `MAX_REDRAWS` times; if every draw matches, the last one is
    /// returned anyway.
    pub async fn next_item(&self, previous: Option<&Item>) -> Result<Item> {
        let mut item = self.items.random_item().await.map_err(upstream)?;

        if let Some(previous) = previous {
            let mut redraws = 0;
            while item.name() == previous.name() && redraws < MAX_REDRAWS {
                item = self.items.random_item().await.map_err(upstream)?;
                redraws += 1;
            }

            if item.name() == previous.name() {
                tracing::debug!("Settled on repeated item {} after {} redraws", item.name(), redraws);
            }
        }

        Ok(item)
    }

    /// Leaderboard, best first
    pub async fn high_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>> {
        let mut scores = self.scores.top_scores(limit).await?;
        rank_descending(&mut scores);
        Ok(scores)
    }

    /// Leaderboard statistics
    pub async fn score_stats(&self) -> Result<crate::store::ScoreStats> {
        self.scores.stats().await
    }

    /// Name of the configured item provider
    pub fn provider_name(&self) -> &str {
        self.items.name()
    }
}

/// Item draws surface as upstream failures; the catalog's own kinds pass through
fn upstream(err: QuizError) -> QuizError {
    match err {
        QuizError::UpstreamUnavailable(_) | QuizError::RefreshFailed(_) | QuizError::Upstream(_) => err,
        other => QuizError::Upstream(other.to_string()),
    }
}
