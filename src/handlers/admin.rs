use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    models::{
        comments::CreateCommentDto,
        posts::{CreatePostDto, UpdatePostDto},
        query::SearchQueryDto,
        response::Response,
        tags::CreateTagDto,
        users::CreateUserDto,
    },
    AppState, Result,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route("/posts", get(get_posts).post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .route("/tags", get(get_tags).post(create_tag))
        .route("/tags/{id}", delete(delete_tag))
        .route("/comments", get(get_comments).post(create_comment))
        .route("/comments/{id}", delete(delete_comment))
}

async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchQueryDto>,
) -> Result<impl IntoResponse> {
    let users = app_state.admin_service.search_users(query.term()).await?;
    Ok((StatusCode::OK, Json(users)))
}

async fn create_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_user): Json<CreateUserDto>,
) -> Result<impl IntoResponse> {
    let user = app_state.admin_service.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchQueryDto>,
) -> Result<impl IntoResponse> {
    let posts = app_state.admin_service.search_posts(query.term()).await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_post): Json<CreatePostDto>,
) -> Result<impl IntoResponse> {
    let post = app_state.admin_service.create_post(new_post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(update_post): Json<UpdatePostDto>,
) -> Result<impl IntoResponse> {
    let post = app_state
        .admin_service
        .update_post(post_id, update_post)
        .await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.admin_service.delete_post(post_id).await?;
    Ok((StatusCode::OK, Json(Response::success("Post deleted"))))
}

async fn get_tags(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let tags = app_state.admin_service.list_tags().await?;
    Ok((StatusCode::OK, Json(tags)))
}

async fn create_tag(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_tag): Json<CreateTagDto>,
) -> Result<impl IntoResponse> {
    let tag = app_state.admin_service.create_tag(new_tag).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn delete_tag(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(tag_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.admin_service.delete_tag(tag_id).await?;
    Ok((StatusCode::OK, Json(Response::success("Tag deleted"))))
}

async fn get_comments(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let comments = app_state.admin_service.list_comments().await?;
    Ok((StatusCode::OK, Json(comments)))
}

async fn create_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_comment): Json<CreateCommentDto>,
) -> Result<impl IntoResponse> {
    let comment = app_state.admin_service.create_comment(new_comment).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn delete_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.admin_service.delete_comment(comment_id).await?;
    Ok((StatusCode::OK, Json(Response::success("Comment deleted"))))
}
