use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::tags::{Tag, TagWithCount},
    Result,
};

use super::PostgresRepo;

#[async_trait]
pub trait TagsRepository: Send + Sync {
    /// Tags ordered by the number of posts carrying them, most used first.
    async fn popular_tags(&self, limit: i64) -> Result<Vec<TagWithCount>>;
    async fn get_tag_by_title(&self, title: &str) -> Result<Option<Tag>>;
    async fn list_tags(&self) -> Result<Vec<TagWithCount>>;
    async fn create_tag(&self, title: &str) -> Result<Tag>;
    async fn delete_tag(&self, tag_id: Uuid) -> Result<bool>;
}

const TAGS_WITH_COUNT: &str = r#"
    SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count
    FROM tags t
    LEFT JOIN post_tags pt ON pt.tag_id = t.id
    GROUP BY t.id, t.title
"#;

#[async_trait]
impl TagsRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn popular_tags(&self, limit: i64) -> Result<Vec<TagWithCount>> {
        let sql = format!("{TAGS_WITH_COUNT} ORDER BY posts_count DESC, t.title ASC LIMIT $1");

        let tags = sqlx::query_as::<_, TagWithCount>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    #[instrument(skip(self))]
    async fn get_tag_by_title(&self, title: &str) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, title FROM tags WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        tracing::debug!(tag_found = tag.is_some(), "Tag lookup completed");

        Ok(tag)
    }

    async fn list_tags(&self) -> Result<Vec<TagWithCount>> {
        let sql = format!("{TAGS_WITH_COUNT} ORDER BY t.title ASC");

        let tags = sqlx::query_as::<_, TagWithCount>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    #[instrument(skip(self))]
    async fn create_tag(&self, title: &str) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, title)
            VALUES ($1, $2)
            RETURNING id, title
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(tag)
    }

    #[instrument(skip(self))]
    async fn delete_tag(&self, tag_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
