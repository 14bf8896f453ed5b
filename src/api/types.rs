use crate::library::Library;
use crate::reader::Reader;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use manga_den_common::LibraryError;
use serde_json::json;

#[derive(Clone)]
pub struct AppState {
    pub library: Library,
    pub reader: Reader,
    pub admin_token: Option<String>,
}

// Standardized Error Response
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Validation(msg) => AppError::BadRequest(msg),
            LibraryError::Conflict(msg) => AppError::Conflict(msg),
            LibraryError::NotFound { .. } => AppError::NotFound(err.to_string()),
            LibraryError::Store(e) => {
                tracing::error!("store failure: {e}");
                AppError::InternalServerError(e.to_string())
            }
        }
    }
}
