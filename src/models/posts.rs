use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

/// Post joined with its author and annotated with comment and like counts.
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct PostWithStats {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author: String,
    pub comments_count: i64,
    pub likes_count: i64,
}

/// Admin search result, used for autocompletion of the comment's post.
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("Slug may only contain letters, digits, '-' and '_'".into()))
    }
}

#[derive(Validate, Debug, Clone, Deserialize)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub text: String,
    #[validate(
        length(max = 200, message = "Slug must be at most 200 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: String,
    pub image: Option<String>,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(rename = "likeIds", default)]
    pub like_ids: Vec<Uuid>,
}

#[derive(Validate, Debug, Clone, Default, Deserialize)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub text: Option<String>,
    #[validate(
        length(max = 200, message = "Slug must be at most 200 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "authorId")]
    pub author_id: Option<Uuid>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "tagIds")]
    pub tag_ids: Option<Vec<Uuid>>,
    #[serde(rename = "likeIds")]
    pub like_ids: Option<Vec<Uuid>>,
}
