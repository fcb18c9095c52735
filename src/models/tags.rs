use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
}

/// Tag annotated with the number of posts carrying it.
#[derive(Debug, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct TagWithCount {
    pub id: Uuid,
    pub title: String,
    pub posts_count: i64,
}

/// A tag of a specific post, as loaded by the batch tag prefetch.
#[derive(Debug, sqlx::FromRow, Clone, PartialEq)]
pub struct PostTag {
    pub post_id: Uuid,
    pub title: String,
    pub posts_count: i64,
}

#[derive(Validate, Debug, Clone, Deserialize)]
pub struct CreateTagDto {
    #[validate(length(min = 1, max = 20, message = "Title must be between 1 and 20 characters"))]
    pub title: String,
}
