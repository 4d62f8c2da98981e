use axum::extract::{Path, Query, State};
use axum::Json;
use grind_core::actor::ActorState;
use grind_core::types::Position;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/characters — refresh every account character from the game API.
pub async fn list_characters(
    State(app): State<AppState>,
) -> Result<Json<Vec<ActorState>>, AppError> {
    Ok(Json(app.characters.list().await?))
}

/// GET /api/characters/{name} — stored state, remote fallback.
pub async fn get_character(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActorState>, AppError> {
    Ok(Json(app.characters.get_or_refresh(&name).await?))
}

/// POST /api/characters/{name}/refresh — force a remote refresh.
pub async fn refresh_character(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActorState>, AppError> {
    Ok(Json(app.characters.refresh(&name).await?))
}

#[derive(serde::Deserialize)]
pub struct MoveBody {
    pub x: i32,
    pub y: i32,
}

/// POST /api/characters/{name}/move — one manual move action.
pub async fn move_character(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<MoveBody>,
) -> Result<Json<ActorState>, AppError> {
    let state = app
        .characters
        .move_to(&name, Position::new(body.x, body.y))
        .await?;
    Ok(Json(state))
}

/// POST /api/characters/{name}/gather — one manual harvest action.
pub async fn gather_character(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActorState>, AppError> {
    Ok(Json(app.characters.gather(&name).await?))
}

#[derive(serde::Deserialize)]
pub struct FightQuery {
    #[serde(default = "default_rest_after")]
    pub rest_after: bool,
}

fn default_rest_after() -> bool {
    true
}

/// POST /api/characters/{name}/fight — one manual fight action, with a
/// follow-up rest scheduled unless `?rest_after=false`.
pub async fn fight_character(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<FightQuery>,
) -> Result<Json<ActorState>, AppError> {
    Ok(Json(app.characters.fight(&name, query.rest_after).await?))
}

/// POST /api/characters/{name}/rest — one manual rest action.
pub async fn rest_character(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActorState>, AppError> {
    Ok(Json(app.characters.rest(&name).await?))
}
