use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{models::users::User, Result};

use super::{contains_pattern, PostgresRepo, SEARCH_LIMIT};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, username: &str) -> Result<User>;
    async fn search_users(&self, term: Option<&str>) -> Result<Vec<User>>;
}

#[async_trait]
impl UserRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn create_user(&self, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %user.id, "User created");

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn search_users(&self, term: Option<&str>) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE $1::text IS NULL OR username ILIKE $1 ESCAPE '\'
            ORDER BY username
            LIMIT $2
            "#,
        )
        .bind(term.map(contains_pattern))
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = users.len(), "User search completed");

        Ok(users)
    }
}
