use serde::{Deserialize, Serialize};

use crate::core::Session;

/// Final score of a finished session, as stored on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl From<&Session> for ScoreRecord {
    fn from(session: &Session) -> Self {
        Self::new(session.player_name().as_str(), session.score())
    }
}

/// Sort records best first. Equal scores keep their relative order.
pub fn rank_descending(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}
