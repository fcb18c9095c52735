//! Template contexts. Every page renders one of these structs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    comments::CommentWithAuthor,
    posts::PostWithStats,
    tags::{PostTag, TagWithCount},
};

pub const TEASER_LENGTH: usize = 200;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SerializedTag {
    pub title: String,
    pub posts_with_tag: i64,
}

impl From<&TagWithCount> for SerializedTag {
    fn from(tag: &TagWithCount) -> Self {
        Self {
            title: tag.title.clone(),
            posts_with_tag: tag.posts_count,
        }
    }
}

impl From<&PostTag> for SerializedTag {
    fn from(tag: &PostTag) -> Self {
        Self {
            title: tag.title.clone(),
            posts_with_tag: tag.posts_count,
        }
    }
}

/// Post as shown in lists and sidebars.
#[derive(Debug, Serialize, Clone)]
pub struct SerializedPost {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<SerializedTag>,
    pub first_tag_title: Option<String>,
}

impl SerializedPost {
    pub fn new(post: &PostWithStats, tags: Vec<SerializedTag>, media_url: &str) -> Self {
        let first_tag_title = tags.first().map(|tag| tag.title.clone());
        Self {
            title: post.title.clone(),
            teaser_text: teaser(&post.text),
            author: post.author.clone(),
            comments_amount: post.comments_count,
            image_url: image_url(post.image.as_deref(), media_url),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags,
            first_tag_title,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct SerializedComment {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

impl From<CommentWithAuthor> for SerializedComment {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            text: comment.text,
            published_at: comment.published_at,
            author: comment.author,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct SerializedPostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<SerializedComment>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<SerializedTag>,
}

impl SerializedPostDetail {
    pub fn new(
        post: PostWithStats,
        comments: Vec<SerializedComment>,
        tags: Vec<SerializedTag>,
        media_url: &str,
    ) -> Self {
        Self {
            image_url: image_url(post.image.as_deref(), media_url),
            title: post.title,
            text: post.text,
            author: post.author,
            comments,
            likes_amount: post.likes_count,
            published_at: post.published_at,
            slug: post.slug,
            tags,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub most_popular_posts: Vec<SerializedPost>,
    pub page_posts: Vec<SerializedPost>,
    pub popular_tags: Vec<SerializedTag>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: SerializedPostDetail,
    pub popular_tags: Vec<SerializedTag>,
    pub most_popular_posts: Vec<SerializedPost>,
}

#[derive(Debug, Serialize)]
pub struct TagFilterContext {
    pub tag: String,
    pub popular_tags: Vec<SerializedTag>,
    pub posts: Vec<SerializedPost>,
    pub most_popular_posts: Vec<SerializedPost>,
}

fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LENGTH).collect()
}

fn image_url(image: Option<&str>, media_url: &str) -> Option<String> {
    image
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", media_url, path.trim_start_matches('/')))
}
