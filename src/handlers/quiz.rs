// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::difficulty::Difficulty,
    quiz::engine::{QuizEngine, StartedSession},
    utils::token::{
        DIFFICULTY_COOKIE, difficulty_cookie, read_cookie, sign_difficulty_token,
        verify_difficulty_token,
    },
};

/// DTO for starting a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(max = 32))]
    pub difficulty: String,
}

/// DTO for answering the current question.
/// A missing `answer` field is treated as no selection.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub answer: String,
}

/// Lists the available difficulty tiers.
pub async fn list_levels() -> impl IntoResponse {
    Json(Difficulty::ALL)
}

/// Starts a quiz session for the requested difficulty.
///
/// Returns 201 with the session id and the first question, and remembers the
/// difficulty in a signed cookie so the quiz can be restarted later.
pub async fn start_session(
    State(engine): State<Arc<QuizEngine>>,
    State(config): State<Config>,
    Json(req): Json<StartQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let started = engine.start(&req.difficulty).await?;
    started_response(&config, started)
}

/// Starts a new session with the difficulty remembered in the cookie.
pub async fn restart(
    State(engine): State<Arc<QuizEngine>>,
    State(config): State<Config>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = read_cookie(&headers, DIFFICULTY_COOKIE)
        .ok_or_else(|| AppError::BadRequest("Unable to retrieve the difficulty".to_string()))?;
    let difficulty = verify_difficulty_token(token, &config.token_secret)?;

    let started = engine.start(difficulty.as_str()).await?;
    started_response(&config, started)
}

/// Returns the current question without its answer.
pub async fn current_question(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    Ok(Json(engine.current_question(&id)?))
}

/// Submits an answer for the current question and advances the session.
///
/// Not idempotent: clients must not retry this blindly.
pub async fn submit_answer(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = parse_session_id(&id)?;
    Ok(Json(engine.submit_answer(&id, &req.answer)?))
}

/// Returns the score report of a session, finished or in progress.
pub async fn get_score(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    Ok(Json(engine.report(&id)?))
}

/// Abandons a session.
pub async fn end_session(
    State(engine): State<Arc<QuizEngine>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    engine.end(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn started_response(config: &Config, started: StartedSession) -> Result<Response, AppError> {
    let token = sign_difficulty_token(
        started.difficulty,
        &config.token_secret,
        config.token_expiration,
    )?;
    let cookie = difficulty_cookie(&token, config.token_expiration)?;

    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(started)).into_response())
}

/// Ids that are not UUIDs cannot name a session.
fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::SessionNotFound(raw.to_string()))
}
