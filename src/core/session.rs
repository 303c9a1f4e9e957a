use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QuizError, Result};

/// Lives a session starts with
pub const STARTING_LIVES: u8 = 3;

/// Longest accepted player name, in characters
pub const MAX_PLAYER_NAME_LEN: usize = 15;

/// A validated player name: 1 to 15 ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(QuizError::InvalidPlayerName(
                "player name is required".to_string(),
            ));
        }

        if raw.chars().count() > MAX_PLAYER_NAME_LEN
            || !raw.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(QuizError::InvalidPlayerName(format!(
                "player name must contain only letters (A-Z, a-z) and be at most {} characters",
                MAX_PLAYER_NAME_LEN
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = QuizError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Lives remain
    Active,
    /// No lives left; terminal
    Over,
}

/// One player's game in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    player_name: PlayerName,
    score: u32,
    lives: u8,
}

impl Session {
    /// Start a fresh session: score 0, three lives
    pub fn new(player_name: &str) -> Result<Self> {
        Ok(Self {
            player_name: PlayerName::parse(player_name)?,
            score: 0,
            lives: STARTING_LIVES,
        })
    }

    /// Rebuild a session from client-held state.
    ///
    /// Lives above the starting count are clamped down.
    pub fn restore(player_name: &str, score: u32, lives: u8) -> Result<Self> {
        Ok(Self {
            player_name: PlayerName::parse(player_name)?,
            score,
            lives: lives.min(STARTING_LIVES),
        })
    }

    pub fn player_name(&self) -> &PlayerName {
        &self.player_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn state(&self) -> SessionState {
        if self.lives == 0 {
            SessionState::Over
        } else {
            SessionState::Active
        }
    }

    pub fn is_over(&self) -> bool {
        self.state() == SessionState::Over
    }

    /// Correct answer
    pub fn add_point(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Wrong answer. Lives never go below zero.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}
