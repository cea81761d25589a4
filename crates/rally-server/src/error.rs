use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("{0}")]
    Engine(#[from] rally_engine::EngineError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::UnknownJob(_) => {
                let body = serde_json::json!({ "error": self.to_string() });
                (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
            }
            ServerError::Engine(_) => {
                // The seeding/admin surface reports failures structurally.
                let body = serde_json::json!({
                    "success": false,
                    "error": self.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
