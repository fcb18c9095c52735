use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    models::{
        posts::PostWithStats,
        views::{
            IndexContext, PostDetailContext, SerializedComment, SerializedPost,
            SerializedPostDetail, SerializedTag, TagFilterContext,
        },
    },
    repositories::{
        comments_repo::CommentsRepository, posts_repo::PostsRepository,
        tags_repo::TagsRepository, BlogRepository,
    },
    Error, Result,
};

pub const POPULAR_POSTS_LIMIT: i64 = 5;
pub const POPULAR_TAGS_LIMIT: i64 = 5;
pub const RECENT_POSTS_LIMIT: i64 = 5;
pub const TAG_POSTS_LIMIT: i64 = 20;

/// Builds the template context of each public page.
#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    media_url: String,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>, media_url: String) -> Self {
        Self { repo, media_url }
    }

    pub async fn index(&self) -> Result<IndexContext> {
        let mut recent = self.repo.recent_posts(RECENT_POSTS_LIMIT).await?;
        // Shown in publication order, oldest of the five first.
        recent.reverse();

        Ok(IndexContext {
            most_popular_posts: self.most_popular_posts().await?,
            page_posts: self.serialize_posts(&recent).await?,
            popular_tags: self.popular_tags().await?,
        })
    }

    pub async fn post_detail(&self, slug: &str) -> Result<PostDetailContext> {
        let post = self
            .repo
            .get_post_by_slug(slug)
            .await?
            .ok_or(Error::NotFound)?;

        let comments = self
            .repo
            .comments_for_post(post.id)
            .await?
            .into_iter()
            .map(SerializedComment::from)
            .collect();

        let mut tags = self.prefetch_tags(&[post.id]).await?;
        let tags = tags.remove(&post.id).unwrap_or_default();

        Ok(PostDetailContext {
            post: SerializedPostDetail::new(post, comments, tags, &self.media_url),
            popular_tags: self.popular_tags().await?,
            most_popular_posts: self.most_popular_posts().await?,
        })
    }

    pub async fn tag_filter(&self, tag_title: &str) -> Result<TagFilterContext> {
        let tag = self
            .repo
            .get_tag_by_title(tag_title)
            .await?
            .ok_or(Error::NotFound)?;

        let related = self.repo.posts_by_tag(tag.id, TAG_POSTS_LIMIT).await?;

        Ok(TagFilterContext {
            tag: tag.title,
            popular_tags: self.popular_tags().await?,
            posts: self.serialize_posts(&related).await?,
            most_popular_posts: self.most_popular_posts().await?,
        })
    }

    async fn most_popular_posts(&self) -> Result<Vec<SerializedPost>> {
        let posts = self.repo.popular_posts(POPULAR_POSTS_LIMIT).await?;
        self.serialize_posts(&posts).await
    }

    async fn popular_tags(&self) -> Result<Vec<SerializedTag>> {
        let tags = self.repo.popular_tags(POPULAR_TAGS_LIMIT).await?;
        Ok(tags.iter().map(SerializedTag::from).collect())
    }

    async fn serialize_posts(&self, posts: &[PostWithStats]) -> Result<Vec<SerializedPost>> {
        let ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();
        let mut tags = self.prefetch_tags(&ids).await?;

        Ok(posts
            .iter()
            .map(|post| {
                let post_tags = tags.remove(&post.id).unwrap_or_default();
                SerializedPost::new(post, post_tags, &self.media_url)
            })
            .collect())
    }

    /// Loads the tags of all given posts at once, grouped by post.
    async fn prefetch_tags(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<SerializedTag>>> {
        let mut grouped: HashMap<Uuid, Vec<SerializedTag>> = HashMap::new();
        for tag in self.repo.tags_for_posts(post_ids).await? {
            grouped
                .entry(tag.post_id)
                .or_default()
                .push(SerializedTag::from(&tag));
        }
        Ok(grouped)
    }
}
