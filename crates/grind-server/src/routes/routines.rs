use axum::extract::{Path, State};
use axum::Json;
use grind_core::routine::{RoutineRecord, RoutineRequest};
use grind_core::GrindError;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/routines/{name} — the character's active routine, or 404.
pub async fn get_routine(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RoutineRecord>, AppError> {
    match app.registry.current(&name)? {
        Some(record) => Ok(Json(record)),
        None => Err(GrindError::RoutineNotFound(name).into()),
    }
}

/// PUT /api/routines/{name} — start (or replace) a routine.
///
/// The submit call runs the routine's first step before returning, so the
/// response reflects a routine that has already acted once.
pub async fn put_routine(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RoutineRequest>,
) -> Result<Json<RoutineRecord>, AppError> {
    app.registry.submit(&name, &request).await?;
    match app.registry.current(&name)? {
        Some(record) => Ok(Json(record)),
        None => Err(GrindError::RoutineNotFound(name).into()),
    }
}

/// DELETE /api/routines/{name} — cooperative cancel.
pub async fn delete_routine(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cancelled = app.registry.cancel(&name)?;
    Ok(Json(serde_json::json!({
        "character": name,
        "cancelled": cancelled,
    })))
}
