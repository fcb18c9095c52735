use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin::admin_handler, pages::pages_handler},
    middleware::require_api_key,
    AppState,
};

pub fn create_routes(app_state: Arc<AppState>) -> Router {
    let admin_route =
        admin_handler().route_layer(from_fn_with_state(app_state.clone(), require_api_key));

    Router::new()
        .merge(pages_handler())
        .nest("/admin", admin_route)
        .nest_service("/static", ServeDir::new(&app_state.config.static_dir))
        .nest_service("/media", ServeDir::new(&app_state.config.media_dir))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
