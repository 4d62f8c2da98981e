use axum::extract::{Path, State};
use axum::Json;
use grind_core::client::MapTile;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/maps/{x}/{y} — map tile pass-through.
pub async fn get_tile(
    State(app): State<AppState>,
    Path((x, y)): Path<(i32, i32)>,
) -> Result<Json<MapTile>, AppError> {
    Ok(Json(app.map.tile(x, y).await?))
}
