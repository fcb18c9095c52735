//! In-memory storage with the same ordering rules as the SQL queries.
//! Lets services and routes be tested without a database.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    models::{
        comments::{Comment, CommentListItem, CommentWithAuthor, CreateCommentDto},
        posts::{CreatePostDto, Post, PostListItem, PostWithStats, UpdatePostDto},
        tags::{PostTag, Tag, TagWithCount},
        users::User,
    },
    Error, Result,
};

use super::{
    comments_repo::CommentsRepository, posts_repo::PostsRepository, tags_repo::TagsRepository,
    user_repo::UserRepository, SEARCH_LIMIT,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    comments: Vec<Comment>,
    post_tags: BTreeSet<(Uuid, Uuid)>,
    post_likes: BTreeSet<(Uuid, Uuid)>,
}

impl State {
    fn username(&self, user_id: Uuid) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn with_stats(&self, post: &Post) -> PostWithStats {
        PostWithStats {
            id: post.id,
            title: post.title.clone(),
            text: post.text.clone(),
            slug: post.slug.clone(),
            image: post.image.clone(),
            published_at: post.published_at,
            author: self.username(post.author_id),
            comments_count: self.comments.iter().filter(|c| c.post_id == post.id).count() as i64,
            likes_count: self.post_likes.iter().filter(|(p, _)| *p == post.id).count() as i64,
        }
    }

    fn tag_posts_count(&self, tag_id: Uuid) -> i64 {
        self.post_tags.iter().filter(|(_, t)| *t == tag_id).count() as i64
    }

    fn tags_with_count(&self) -> Vec<TagWithCount> {
        self.tags
            .iter()
            .map(|tag| TagWithCount {
                id: tag.id,
                title: tag.title.clone(),
                posts_count: self.tag_posts_count(tag.id),
            })
            .collect()
    }

    fn check_unique_slug(&self, slug: &str, except: Option<Uuid>) -> Result<()> {
        let taken = self
            .posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except);
        if taken {
            return Err(Error::BadRequest("Record already exists".to_string()));
        }
        Ok(())
    }

    fn check_refs(&self, author_id: Uuid, tag_ids: &[Uuid], like_ids: &[Uuid]) -> Result<()> {
        let user_exists = |id: &Uuid| self.users.iter().any(|u| u.id == *id);
        let tag_exists = |id: &Uuid| self.tags.iter().any(|t| t.id == *id);
        if !user_exists(&author_id)
            || !tag_ids.iter().all(tag_exists)
            || !like_ids.iter().all(user_exists)
        {
            return Err(Error::BadRequest(
                "Referenced record does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn replace_relations(
        &mut self,
        post_id: Uuid,
        tag_ids: Option<&[Uuid]>,
        like_ids: Option<&[Uuid]>,
    ) {
        if let Some(tag_ids) = tag_ids {
            self.post_tags.retain(|(p, _)| *p != post_id);
            self.post_tags.extend(tag_ids.iter().map(|t| (post_id, *t)));
        }
        if let Some(like_ids) = like_ids {
            self.post_likes.retain(|(p, _)| *p != post_id);
            self.post_likes.extend(like_ids.iter().map(|u| (post_id, *u)));
        }
    }
}

#[derive(Default)]
pub struct MemoryRepo {
    state: Mutex<State>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str) -> Uuid {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::now_v7();
        state.users.push(User {
            id,
            username: username.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_tag(&self, title: &str) -> Uuid {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::now_v7();
        state.tags.push(Tag {
            id,
            title: title.to_string(),
        });
        id
    }

    pub fn add_post(
        &self,
        slug: &str,
        author_id: Uuid,
        published_at: DateTime<Utc>,
        tag_ids: &[Uuid],
        like_ids: &[Uuid],
    ) -> Uuid {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::now_v7();
        state.posts.push(Post {
            id,
            title: format!("Post {slug}"),
            text: format!("Text of {slug}"),
            slug: slug.to_string(),
            image: None,
            author_id,
            published_at,
        });
        state.replace_relations(id, Some(tag_ids), Some(like_ids));
        id
    }

    pub fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
        published_at: DateTime<Utc>,
    ) {
        let mut state = self.state.lock().unwrap();
        state.comments.push(Comment {
            id: Uuid::now_v7(),
            post_id,
            author_id,
            text: text.to_string(),
            published_at,
        });
    }
}

#[async_trait]
impl PostsRepository for MemoryRepo {
    async fn recent_posts(&self, limit: i64) -> Result<Vec<PostWithStats>> {
        let state = self.state.lock().unwrap();
        let mut posts: Vec<_> = state.posts.iter().map(|p| state.with_stats(p)).collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn popular_posts(&self, limit: i64) -> Result<Vec<PostWithStats>> {
        let state = self.state.lock().unwrap();
        let mut posts: Vec<_> = state.posts.iter().map(|p| state.with_stats(p)).collect();
        posts.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then(b.published_at.cmp(&a.published_at))
        });
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn posts_by_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<PostWithStats>> {
        let state = self.state.lock().unwrap();
        let mut posts: Vec<_> = state
            .posts
            .iter()
            .filter(|p| state.post_tags.contains(&(p.id, tag_id)))
            .map(|p| state.with_stats(p))
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<PostWithStats>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| state.with_stats(p)))
    }

    async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTag>> {
        let state = self.state.lock().unwrap();
        let titles: HashMap<Uuid, &str> = state
            .tags
            .iter()
            .map(|t| (t.id, t.title.as_str()))
            .collect();
        let mut tags: Vec<_> = state
            .post_tags
            .iter()
            .filter(|(p, _)| post_ids.contains(p))
            .map(|(post_id, tag_id)| PostTag {
                post_id: *post_id,
                title: titles[tag_id].to_string(),
                posts_count: state.tag_posts_count(*tag_id),
            })
            .collect();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }

    async fn search_posts(&self, term: Option<&str>) -> Result<Vec<PostListItem>> {
        let state = self.state.lock().unwrap();
        let term = term.map(str::to_lowercase);
        let mut posts: Vec<_> = state
            .posts
            .iter()
            .filter(|p| match &term {
                Some(term) => p.title.to_lowercase().contains(term),
                None => true,
            })
            .map(|p| PostListItem {
                id: p.id,
                title: p.title.clone(),
                slug: p.slug.clone(),
                published_at: p.published_at,
            })
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(SEARCH_LIMIT as usize);
        Ok(posts)
    }

    async fn create_post(&self, post: &CreatePostDto) -> Result<Post> {
        let mut state = self.state.lock().unwrap();
        state.check_unique_slug(&post.slug, None)?;
        state.check_refs(post.author_id, &post.tag_ids, &post.like_ids)?;

        let created = Post {
            id: Uuid::now_v7(),
            title: post.title.clone(),
            text: post.text.clone(),
            slug: post.slug.clone(),
            image: post.image.clone(),
            author_id: post.author_id,
            published_at: post.published_at.unwrap_or_else(Utc::now),
        };
        state.posts.push(created.clone());
        state.replace_relations(
            created.id,
            Some(post.tag_ids.as_slice()),
            Some(post.like_ids.as_slice()),
        );
        Ok(created)
    }

    async fn update_post(&self, post_id: Uuid, post: &UpdatePostDto) -> Result<Option<Post>> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.posts.iter().position(|p| p.id == post_id) else {
            return Ok(None);
        };
        if let Some(slug) = &post.slug {
            state.check_unique_slug(slug, Some(post_id))?;
        }
        let author_id = post.author_id.unwrap_or(state.posts[index].author_id);
        state.check_refs(
            author_id,
            post.tag_ids.as_deref().unwrap_or_default(),
            post.like_ids.as_deref().unwrap_or_default(),
        )?;

        let current = &mut state.posts[index];
        if let Some(title) = &post.title {
            current.title = title.clone();
        }
        if let Some(text) = &post.text {
            current.text = text.clone();
        }
        if let Some(slug) = &post.slug {
            current.slug = slug.clone();
        }
        if let Some(image) = &post.image {
            current.image = Some(image.clone());
        }
        if let Some(published_at) = post.published_at {
            current.published_at = published_at;
        }
        current.author_id = author_id;
        let updated = current.clone();

        state.replace_relations(post_id, post.tag_ids.as_deref(), post.like_ids.as_deref());
        Ok(Some(updated))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != post_id);
        state.comments.retain(|c| c.post_id != post_id);
        state.post_tags.retain(|(p, _)| *p != post_id);
        state.post_likes.retain(|(p, _)| *p != post_id);
        Ok(state.posts.len() < before)
    }
}

#[async_trait]
impl TagsRepository for MemoryRepo {
    async fn popular_tags(&self, limit: i64) -> Result<Vec<TagWithCount>> {
        let state = self.state.lock().unwrap();
        let mut tags = state.tags_with_count();
        tags.sort_by(|a, b| b.posts_count.cmp(&a.posts_count).then(a.title.cmp(&b.title)));
        tags.truncate(limit as usize);
        Ok(tags)
    }

    async fn get_tag_by_title(&self, title: &str) -> Result<Option<Tag>> {
        let state = self.state.lock().unwrap();
        Ok(state.tags.iter().find(|t| t.title == title).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<TagWithCount>> {
        let state = self.state.lock().unwrap();
        let mut tags = state.tags_with_count();
        tags.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tags)
    }

    async fn create_tag(&self, title: &str) -> Result<Tag> {
        let mut state = self.state.lock().unwrap();
        if state.tags.iter().any(|t| t.title == title) {
            return Err(Error::BadRequest("Record already exists".to_string()));
        }
        let tag = Tag {
            id: Uuid::now_v7(),
            title: title.to_string(),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete_tag(&self, tag_id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.tags.len();
        state.tags.retain(|t| t.id != tag_id);
        state.post_tags.retain(|(_, t)| *t != tag_id);
        Ok(state.tags.len() < before)
    }
}

#[async_trait]
impl CommentsRepository for MemoryRepo {
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let state = self.state.lock().unwrap();
        let mut comments: Vec<_> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| c.published_at);
        Ok(comments
            .into_iter()
            .map(|c| CommentWithAuthor {
                text: c.text.clone(),
                published_at: c.published_at,
                author: state.username(c.author_id),
            })
            .collect())
    }

    async fn list_comments(&self) -> Result<Vec<CommentListItem>> {
        let state = self.state.lock().unwrap();
        let mut comments: Vec<_> = state
            .comments
            .iter()
            .map(|c| CommentListItem {
                id: c.id,
                text: c.text.clone(),
                published_at: c.published_at,
            })
            .collect();
        comments.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(comments)
    }

    async fn create_comment(&self, comment: &CreateCommentDto) -> Result<Comment> {
        let mut state = self.state.lock().unwrap();
        let post_exists = state.posts.iter().any(|p| p.id == comment.post_id);
        let author_exists = state.users.iter().any(|u| u.id == comment.author_id);
        if !post_exists || !author_exists {
            return Err(Error::BadRequest(
                "Referenced record does not exist".to_string(),
            ));
        }
        let created = Comment {
            id: Uuid::now_v7(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text.clone(),
            published_at: comment.published_at.unwrap_or_else(Utc::now),
        };
        state.comments.push(created.clone());
        Ok(created)
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        Ok(state.comments.len() < before)
    }
}

#[async_trait]
impl UserRepository for MemoryRepo {
    async fn create_user(&self, username: &str) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == username) {
            return Err(Error::BadRequest("Record already exists".to_string()));
        }
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn search_users(&self, term: Option<&str>) -> Result<Vec<User>> {
        let state = self.state.lock().unwrap();
        let term = term.map(str::to_lowercase);
        let mut users: Vec<_> = state
            .users
            .iter()
            .filter(|u| match &term {
                Some(term) => u.username.to_lowercase().contains(term),
                None => true,
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users.truncate(SEARCH_LIMIT as usize);
        Ok(users)
    }
}
