use sqlx::PgPool;

use self::{
    comments_repo::CommentsRepository, posts_repo::PostsRepository, tags_repo::TagsRepository,
    user_repo::UserRepository,
};

pub mod comments_repo;
#[cfg(test)]
pub mod memory;
pub mod posts_repo;
pub mod tags_repo;
pub mod user_repo;

/// Maximum rows returned by the admin search endpoints.
pub const SEARCH_LIMIT: i64 = 50;

/// `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\` taken literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Everything the services need from storage.
pub trait BlogRepository:
    PostsRepository + TagsRepository + CommentsRepository + UserRepository
{
}

impl<T> BlogRepository for T where
    T: PostsRepository + TagsRepository + CommentsRepository + UserRepository
{
}

#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
