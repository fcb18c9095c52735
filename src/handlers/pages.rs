use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use tera::Tera;

use crate::{AppState, Error, Result};

pub fn pages_handler() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/posts/{slug}/", get(post_detail))
        .route("/tags/{tag_title}/", get(tag_filter))
        .route("/contacts/", get(contacts))
}

fn render<C: Serialize>(templates: &Tera, name: &str, context: &C) -> Result<Html<String>> {
    let context = tera::Context::from_serialize(context)?;
    let body = templates.render(name, &context)?;
    Ok(Html(body))
}

/// Renders `name` with the loaded context, or the 404 page when the
/// requested record does not exist.
fn render_page<C: Serialize>(
    templates: &Tera,
    name: &str,
    context: Result<C>,
) -> Result<Response> {
    match context {
        Ok(context) => Ok(render(templates, name, &context)?.into_response()),
        Err(Error::NotFound) => {
            let body = templates.render("404.html", &tera::Context::new())?;
            Ok((StatusCode::NOT_FOUND, Html(body)).into_response())
        }
        Err(err) => Err(err),
    }
}

async fn index(Extension(app_state): Extension<Arc<AppState>>) -> Result<Response> {
    let context = app_state.blog_service.index().await;
    render_page(&app_state.templates, "index.html", context)
}

async fn post_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let context = app_state.blog_service.post_detail(&slug).await;
    render_page(&app_state.templates, "post-details.html", context)
}

async fn tag_filter(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(tag_title): Path<String>,
) -> Result<Response> {
    let context = app_state.blog_service.tag_filter(&tag_title).await;
    render_page(&app_state.templates, "posts-list.html", context)
}

async fn contacts(Extension(app_state): Extension<Arc<AppState>>) -> Result<Html<String>> {
    let body = app_state
        .templates
        .render("contacts.html", &tera::Context::new())?;
    Ok(Html(body))
}
