use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Comment {
    pub id: Uuid,
    #[serde(rename = "postId")]
    pub post_id: Uuid,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    pub text: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct CommentWithAuthor {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// Admin list row: only the columns shown in the comment list.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct CommentListItem {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

#[derive(Validate, Debug, Clone, Deserialize)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, message = "Comment text is required"))]
    pub text: String,
    #[serde(rename = "postId")]
    pub post_id: Uuid,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
}
