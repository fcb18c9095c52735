use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

use crate::{AppState, Error, Result};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects admin requests that do not carry the configured API key.
pub async fn require_api_key(
    State(app_state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse> {
    let authorized = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == app_state.config.api_key);

    if !authorized {
        tracing::warn!(path = %req.uri().path(), "Rejected admin request without valid API key");
        return Err(Error::Unauthorized);
    }

    Ok(next.run(req).await)
}
