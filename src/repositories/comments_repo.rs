use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::comments::{Comment, CommentListItem, CommentWithAuthor, CreateCommentDto},
    Result,
};

use super::PostgresRepo;

#[async_trait]
pub trait CommentsRepository: Send + Sync {
    /// Comments of one post with their author's name, oldest first.
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>>;
    async fn list_comments(&self) -> Result<Vec<CommentListItem>>;
    async fn create_comment(&self, comment: &CreateCommentDto) -> Result<Comment>;
    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool>;
}

#[async_trait]
impl CommentsRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.text, c.published_at, u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.published_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_comments(&self) -> Result<Vec<CommentListItem>> {
        let comments = sqlx::query_as::<_, CommentListItem>(
            r#"
            SELECT id, text, published_at
            FROM comments
            ORDER BY published_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    #[instrument(skip(self, comment), fields(post_id = %comment.post_id))]
    async fn create_comment(&self, comment: &CreateCommentDto) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, author_id, text, published_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, author_id, text, published_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.published_at.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    #[instrument(skip(self))]
    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
