//! HTTP API endpoints.
//!
//! Thin wrappers over [`AppState`]: extract, call the engine, serialise.
//! Clients poll `state` (or the cheaper `version`) to observe changes.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::{GameError, GameResult};
use crate::protocol::*;
use crate::state::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/join", post(join))
        .route("/api/rooms/{code}/state", get(poll_state))
        .route("/api/rooms/{code}/version", get(room_version))
        .route("/api/rooms/{code}/start", post(start_game))
        .route("/api/rooms/{code}/start-vote", post(start_vote))
        .route("/api/rooms/{code}/vote", post(cast_vote))
        .route("/api/rooms/{code}/end-round", post(end_round))
        .route("/api/rooms/{code}/chat", post(send_chat))
        .with_state(state)
}

/// Log rejected requests at the boundary and pass the error through
fn log_rejection(action: &'static str, code: &str) -> impl FnOnce(GameError) -> GameError {
    let code = code.to_string();
    move |e| {
        tracing::warn!("{} rejected for room {}: {}", action, code, e);
        e
    }
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// POST /api/join
async fn join(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> GameResult<Json<JoinResponse>> {
    let Json(req) = payload?;
    let response = state
        .join(&req.name, &req.room_code)
        .await
        .map_err(log_rejection("Join", &req.room_code))?;
    Ok(Json(response))
}

/// GET /api/rooms/{code}/state?playerId=
async fn poll_state(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> GameResult<Json<PlayerState>> {
    let Query(query) = query?;
    Ok(Json(state.poll_state(&code, &query.player_id).await?))
}

/// GET /api/rooms/{code}/version
async fn room_version(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> GameResult<Json<VersionResponse>> {
    Ok(Json(state.room_version(&code).await?))
}

/// POST /api/rooms/{code}/start
async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<HostActionRequest>, JsonRejection>,
) -> GameResult<Json<PlayerState>> {
    let Json(req) = payload?;
    let response = state
        .start_game(&code, &req.player_id)
        .await
        .map_err(log_rejection("Start game", &code))?;
    Ok(Json(response))
}

/// POST /api/rooms/{code}/start-vote
async fn start_vote(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<HostActionRequest>, JsonRejection>,
) -> GameResult<Json<PlayerState>> {
    let Json(req) = payload?;
    let response = state
        .start_vote(&code, &req.player_id)
        .await
        .map_err(log_rejection("Start vote", &code))?;
    Ok(Json(response))
}

/// POST /api/rooms/{code}/vote
async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> GameResult<Json<PlayerState>> {
    let Json(req) = payload?;
    let response = state
        .cast_vote(&code, &req.voter_id, &req.target_id)
        .await
        .map_err(log_rejection("Vote", &code))?;
    Ok(Json(response))
}

/// POST /api/rooms/{code}/end-round
async fn end_round(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<HostActionRequest>, JsonRejection>,
) -> GameResult<Json<EndRoundResponse>> {
    let Json(req) = payload?;
    let response = state
        .end_round(&code, &req.player_id)
        .await
        .map_err(log_rejection("End round", &code))?;
    Ok(Json(response))
}

/// POST /api/rooms/{code}/chat
async fn send_chat(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> GameResult<Json<ChatResponse>> {
    let Json(req) = payload?;
    let response = state
        .send_chat(&code, &req.name, &req.message)
        .await
        .map_err(log_rejection("Chat", &code))?;
    Ok(Json(response))
}
