use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        comments::{Comment, CommentListItem, CreateCommentDto},
        posts::{CreatePostDto, Post, PostListItem, UpdatePostDto},
        tags::{CreateTagDto, Tag, TagWithCount},
        users::{CreateUserDto, User},
    },
    repositories::{
        comments_repo::CommentsRepository, posts_repo::PostsRepository,
        tags_repo::TagsRepository, user_repo::UserRepository, BlogRepository,
    },
    Error, Result,
};

/// Content management behind the admin API. Relations of a post (author,
/// tags, likes) are edited by raw id.
#[derive(Clone)]
pub struct AdminService {
    repo: Arc<dyn BlogRepository>,
}

impl AdminService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    pub async fn search_users(&self, term: Option<&str>) -> Result<Vec<User>> {
        self.repo.search_users(term).await
    }

    pub async fn create_user(&self, mut user: CreateUserDto) -> Result<User> {
        user.username = user.username.trim().to_string();
        user.validate()?;
        self.repo.create_user(&user.username).await
    }

    pub async fn search_posts(&self, term: Option<&str>) -> Result<Vec<PostListItem>> {
        self.repo.search_posts(term).await
    }

    pub async fn create_post(&self, post: CreatePostDto) -> Result<Post> {
        post.validate()?;
        self.repo.create_post(&post).await
    }

    pub async fn update_post(&self, post_id: Uuid, post: UpdatePostDto) -> Result<Post> {
        post.validate()?;
        self.repo
            .update_post(post_id, &post)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        found(self.repo.delete_post(post_id).await?)
    }

    pub async fn list_tags(&self) -> Result<Vec<TagWithCount>> {
        self.repo.list_tags().await
    }

    pub async fn create_tag(&self, mut tag: CreateTagDto) -> Result<Tag> {
        tag.title = tag.title.trim().to_string();
        tag.validate()?;
        self.repo.create_tag(&tag.title).await
    }

    pub async fn delete_tag(&self, tag_id: Uuid) -> Result<()> {
        found(self.repo.delete_tag(tag_id).await?)
    }

    pub async fn list_comments(&self) -> Result<Vec<CommentListItem>> {
        self.repo.list_comments().await
    }

    pub async fn create_comment(&self, comment: CreateCommentDto) -> Result<Comment> {
        comment.validate()?;
        self.repo.create_comment(&comment).await
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        found(self.repo.delete_comment(comment_id).await?)
    }
}

fn found(deleted: bool) -> Result<()> {
    if deleted {
        Ok(())
    } else {
        Err(Error::NotFound)
    }
}
