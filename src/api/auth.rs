use crate::api::types::{AppError, AppState};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Gates mutating routes behind the configured admin token. Reads stay
/// public; with no token configured the gate is open (dev mode).
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if req.method() == Method::GET {
        return next.run(req).await;
    }
    let Some(expected) = state.admin_token.as_deref() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected) {
        next.run(req).await
    } else {
        AppError::Unauthorized("admin token required".to_string()).into_response()
    }
}
