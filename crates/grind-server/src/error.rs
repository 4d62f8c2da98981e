use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grind_core::GrindError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<GrindError>() {
            match e {
                GrindError::CharacterNotFound(_) | GrindError::RoutineNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                GrindError::UnsupportedRoutine(_) | GrindError::Config(_) => {
                    StatusCode::BAD_REQUEST
                }
                GrindError::Api { .. } | GrindError::Http(_) => StatusCode::BAD_GATEWAY,
                GrindError::Store(_)
                | GrindError::Json(_)
                | GrindError::Yaml(_)
                | GrindError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
