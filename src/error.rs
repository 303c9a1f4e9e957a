use serde::Serialize;
use thiserror::Error;

/// Broad error category, used by transport layers to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing caller input
    Validation,
    /// Requested resource is absent (e.g. empty leaderboard)
    NotFound,
    /// The item catalog could not serve a request
    Upstream,
    /// The score store failed
    Persistence,
    /// Anything unexpected; details must not leak to callers
    Internal,
}

/// Main error type for the quiz engine
#[derive(Error, Debug)]
pub enum QuizError {
    /// Player name is empty, contains non-letters, or is too long
    #[error("Invalid player name: {0}")]
    InvalidPlayerName(String),

    /// Missing or malformed caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Catalog host unreachable (DNS, connection refused)
    #[error("Item catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Any other catalog fetch/parse failure, including an empty result after filtering
    #[error("Item cache refresh failed: {0}")]
    RefreshFailed(String),

    /// Item draw failed for a reason not tied to a refresh
    #[error("Item provider error: {0}")]
    Upstream(String),

    /// Score store failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// SQLite failure in the score store
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl QuizError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::InvalidPlayerName(_) | QuizError::Validation(_) => ErrorKind::Validation,
            QuizError::NotFound(_) => ErrorKind::NotFound,
            QuizError::UpstreamUnavailable(_)
            | QuizError::RefreshFailed(_)
            | QuizError::Upstream(_)
            | QuizError::HttpRequest(_) => ErrorKind::Upstream,
            QuizError::Persistence(_) | QuizError::Database(_) => ErrorKind::Persistence,
            QuizError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Message that is safe to hand to an end user.
    ///
    /// Internal errors collapse to a generic message; everything else passes through.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether a caller may treat this as "nothing yet" rather than a hard failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuizError::NotFound(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, QuizError>;
