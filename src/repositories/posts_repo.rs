use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::{
        posts::{CreatePostDto, Post, PostListItem, PostWithStats, UpdatePostDto},
        tags::PostTag,
    },
    Result,
};

use super::{contains_pattern, PostgresRepo, SEARCH_LIMIT};

#[async_trait]
pub trait PostsRepository: Sync + Send {
    /// Most recently published posts, newest first.
    async fn recent_posts(&self, limit: i64) -> Result<Vec<PostWithStats>>;
    /// Posts ordered by number of likes, most liked first.
    async fn popular_posts(&self, limit: i64) -> Result<Vec<PostWithStats>>;
    /// Posts carrying the tag, newest first.
    async fn posts_by_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<PostWithStats>>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<PostWithStats>>;
    /// Tags of every given post in one query, each annotated with its post count.
    async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTag>>;

    async fn search_posts(&self, term: Option<&str>) -> Result<Vec<PostListItem>>;
    async fn create_post(&self, post: &CreatePostDto) -> Result<Post>;
    async fn update_post(&self, post_id: Uuid, post: &UpdatePostDto) -> Result<Option<Post>>;
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;
}

// Author is joined and counts are computed per row so that a page of posts
// costs a single round trip.
const POSTS_WITH_STATS: &str = r#"
    SELECT
        p.id,
        p.title,
        p.text,
        p.slug,
        p.image,
        p.published_at,
        u.username AS author,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
        (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

const POST_COLUMNS: &str = "id, title, text, slug, image, author_id, published_at";

async fn replace_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<()> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS tag_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tag_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn replace_likes(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    user_ids: &[Uuid],
) -> Result<()> {
    sqlx::query("DELETE FROM post_likes WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO post_likes (post_id, user_id)
        SELECT $1, user_id FROM UNNEST($2::uuid[]) AS user_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn recent_posts(&self, limit: i64) -> Result<Vec<PostWithStats>> {
        let sql = format!("{POSTS_WITH_STATS} ORDER BY p.published_at DESC LIMIT $1");

        let posts = sqlx::query_as::<_, PostWithStats>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn popular_posts(&self, limit: i64) -> Result<Vec<PostWithStats>> {
        let sql = format!(
            "{POSTS_WITH_STATS} ORDER BY likes_count DESC, p.published_at DESC LIMIT $1"
        );

        let posts = sqlx::query_as::<_, PostWithStats>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn posts_by_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<PostWithStats>> {
        let sql = format!(
            "{POSTS_WITH_STATS} JOIN post_tags pt ON pt.post_id = p.id \
             WHERE pt.tag_id = $1 ORDER BY p.published_at DESC LIMIT $2"
        );

        let posts = sqlx::query_as::<_, PostWithStats>(&sql)
            .bind(tag_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<PostWithStats>> {
        let sql = format!("{POSTS_WITH_STATS} WHERE p.slug = $1");

        let post = sqlx::query_as::<_, PostWithStats>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        tracing::debug!(post_found = post.is_some(), "Post lookup completed");

        Ok(post)
    }

    #[instrument(skip(self), fields(posts = post_ids.len()))]
    async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTag>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags = sqlx::query_as::<_, PostTag>(
            r#"
            SELECT
                pt.post_id,
                t.title,
                (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.title ASC
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn search_posts(&self, term: Option<&str>) -> Result<Vec<PostListItem>> {
        let posts = sqlx::query_as::<_, PostListItem>(
            r#"
            SELECT id, title, slug, published_at
            FROM posts
            WHERE $1::text IS NULL OR title ILIKE $1 ESCAPE '\'
            ORDER BY published_at DESC
            LIMIT $2
            "#,
        )
        .bind(term.map(contains_pattern))
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    #[instrument(skip(self, post), fields(slug = %post.slug))]
    async fn create_post(&self, post: &CreatePostDto) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO posts ({POST_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {POST_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::now_v7())
            .bind(&post.title)
            .bind(&post.text)
            .bind(&post.slug)
            .bind(post.image.as_deref())
            .bind(post.author_id)
            .bind(post.published_at.unwrap_or_else(Utc::now))
            .fetch_one(&mut *tx)
            .await?;

        replace_tags(&mut tx, created.id, &post.tag_ids).await?;
        replace_likes(&mut tx, created.id, &post.like_ids).await?;

        tx.commit().await?;

        tracing::info!(post_id = %created.id, "Post created");

        Ok(created)
    }

    #[instrument(skip(self, post))]
    async fn update_post(&self, post_id: Uuid, post: &UpdatePostDto) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                text = COALESCE($3, text),
                slug = COALESCE($4, slug),
                image = COALESCE($5, image),
                author_id = COALESCE($6, author_id),
                published_at = COALESCE($7, published_at)
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(post.title.as_deref())
            .bind(post.text.as_deref())
            .bind(post.slug.as_deref())
            .bind(post.image.as_deref())
            .bind(post.author_id)
            .bind(post.published_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        if let Some(tag_ids) = &post.tag_ids {
            replace_tags(&mut tx, post_id, tag_ids).await?;
        }
        if let Some(like_ids) = &post.like_ids {
            replace_likes(&mut tx, post_id, like_ids).await?;
        }

        tx.commit().await?;

        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
