//! HTTP surface of the quiz.
//!
//! Request bodies are parsed into plain payload structs first, then turned into
//! validated domain values (`Session`, `Item`) before any game rule runs.

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::{Item, ScoreRecord, Session};
use crate::engine::{AnswerOutcome, GameStart, QuizEngine};
use crate::error::{ErrorKind, QuizError};
use crate::store::DEFAULT_TOP_LIMIT;

/// Largest leaderboard a client may ask for
pub const MAX_TOP_LIMIT: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuizEngine>,
}

impl AppState {
    pub fn new(engine: QuizEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(default)]
    pub player_name: String,
}

/// Session as held by the client between answers
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    #[serde(default)]
    pub player_name: String,
    pub score: Option<u32>,
    pub lives: Option<u8>,
}

impl SessionPayload {
    /// Every field must be present; the name is validated by `Session::restore`
    pub fn into_session(self) -> Result<Session, QuizError> {
        let score = self
            .score
            .ok_or_else(|| QuizError::Validation("session score is required".to_string()))?;
        let lives = self
            .lives
            .ok_or_else(|| QuizError::Validation("session lives are required".to_string()))?;

        Session::restore(&self.player_name, score, lives)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    #[serde(default, alias = "game")]
    pub session: Option<SessionPayload>,
    #[serde(default, alias = "currentPokemon")]
    pub current_item: Option<ItemPayload>,
    #[serde(default)]
    pub player_answer: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRequest {
    #[serde(default, alias = "previousPokemon")]
    pub previous_item: Option<ItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ScoresQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: ErrorKind,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub provider: String,
}

impl From<ItemPayload> for Item {
    fn from(payload: ItemPayload) -> Self {
        Item::new(payload.id, payload.name, payload.image_url)
    }
}

impl AnswerRequest {
    /// Check presence of session and item, and validate the session
    pub fn into_parts(self) -> Result<(Session, Item, String), QuizError> {
        let session = self
            .session
            .ok_or_else(|| QuizError::Validation("session is required".to_string()))?;
        let item = self
            .current_item
            .ok_or_else(|| QuizError::Validation("current item is required".to_string()))?;

        Ok((session.into_session()?, item.into(), self.player_answer))
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/game/start", post(start_handler))
        .route("/game/answer", post(answer_handler))
        .route("/game/next", post(next_handler))
        .route("/game/scores", get(scores_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "PokeQuiz API online".to_string(),
        version: crate::VERSION.to_string(),
        provider: state.engine.provider_name().to_string(),
    })
}

async fn start_handler(
    State(state): State<AppState>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<GameStart>, AppError> {
    let Json(req) = body.map_err(|e| QuizError::Validation(e.body_text()))?;

    let start = state.engine.start_game(&req.player_name).await?;
    tracing::info!("Game started: {} → {}", start.player_name, start.current_item.name());

    Ok(Json(start))
}

async fn answer_handler(
    State(state): State<AppState>,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerOutcome>, AppError> {
    let Json(req) = body.map_err(|e| QuizError::Validation(e.body_text()))?;
    let (mut session, item, answer) = req.into_parts()?;

    let outcome = state
        .engine
        .submit_answer(&mut session, &item, &answer)
        .await
        .map_err(|e| AppError::on(e, DrawFailure::ServerError))?;

    tracing::debug!(
        "{} answered {:?} for {} → score {}, lives {}",
        session.player_name(),
        answer,
        item.name(),
        outcome.score,
        outcome.lives
    );

    Ok(Json(outcome))
}

async fn next_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<Item>, AppError> {
    let req: NextRequest = if body.iter().all(u8::is_ascii_whitespace) {
        NextRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| QuizError::Validation(e.to_string()))?
    };
    let previous = req.previous_item.map(Item::from);

    let item = state
        .engine
        .next_item(previous.as_ref())
        .await
        .map_err(|e| AppError::on(e, DrawFailure::NotFoundOrServerError))?;
    Ok(Json(item))
}

async fn scores_handler(
    State(state): State<AppState>,
    query: Result<Query<ScoresQuery>, QueryRejection>,
) -> Result<Json<Vec<ScoreRecord>>, AppError> {
    let Query(query) = query.map_err(|e| QuizError::Validation(e.body_text()))?;
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);

    let scores = state.engine.high_scores(limit).await?;
    Ok(Json(scores))
}

/// How a failed item draw is reported; each route has its own convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawFailure {
    /// 502, used by `/game/start`
    BadGateway,
    /// 500, used by `/game/answer`
    ServerError,
    /// 404 when the catalog cannot be reached, 500 otherwise; used by `/game/next`
    NotFoundOrServerError,
}

/// Maps engine errors onto HTTP responses
pub struct AppError {
    error: QuizError,
    draw_failure: DrawFailure,
}

impl AppError {
    pub fn on(error: QuizError, draw_failure: DrawFailure) -> Self {
        Self { error, draw_failure }
    }

    pub fn status(&self) -> StatusCode {
        match self.error.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Upstream => match (self.draw_failure, &self.error) {
                (DrawFailure::BadGateway, _) => StatusCode::BAD_GATEWAY,
                (DrawFailure::NotFoundOrServerError, QuizError::UpstreamUnavailable(_)) => {
                    StatusCode::NOT_FOUND
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ErrorKind::Persistence | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.error.kind();

        match kind {
            ErrorKind::Validation | ErrorKind::NotFound => {
                tracing::debug!("{} - {}", status, self.error)
            }
            ErrorKind::Upstream => tracing::warn!("{} - {}", status, self.error),
            ErrorKind::Persistence | ErrorKind::Internal => {
                tracing::error!("{} - {:?}", status, self.error)
            }
        }

        let body = ErrorResponse {
            error: self.error.public_message(),
            kind,
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<QuizError>,
{
    fn from(err: E) -> Self {
        Self::on(err.into(), DrawFailure::BadGateway)
    }
}
