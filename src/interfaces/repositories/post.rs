use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    entities::{
        post::{Post, PostChanges, PostFilter, PostInsert},
        tag::Tag,
    },
    errors::AppError,
    repositories::{
        sqlx_repo::SqlxPostRepo,
        tag::{group_tag_links, TagLink},
    },
};

const POST_COLUMNS: &str = "id, title, slug, content, is_active, translations, created_at";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError>;
    async fn get_post_by_id(&self, id: i64) -> Result<Post, AppError>;
    /// Inactive posts are reported as not found.
    async fn get_active_post_by_slug(&self, slug: &str) -> Result<Post, AppError>;
    /// Newest first.
    async fn list_posts(&self, active_only: bool, filter: &PostFilter) -> Result<Vec<Post>, AppError>;
    async fn update_post(&self, id: i64, changes: &PostChanges) -> Result<Post, AppError>;
    /// Removes the post together with its comments and tag links.
    async fn delete_post(&self, id: i64) -> Result<(), AppError>;
    async fn post_exists(&self, id: i64) -> Result<bool, AppError>;
    async fn post_exists_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError>;
    async fn tags_for_posts(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, AppError>;
}

impl SqlxPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxPostRepo { pool }
    }
}

async fn link_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: i64,
    tag_ids: &[i64],
) -> Result<(), AppError> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query("INSERT INTO post_tags (post_id, tag_id) SELECT $1, UNNEST($2::BIGINT[])")
        .bind(post_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[async_trait]
impl PostRepository for SqlxPostRepo {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (title, slug, content, is_active, translations, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(post.is_active)
        .bind(Json(&post.translations))
        .bind(post.created_at)
        .fetch_one(&mut *tx)
        .await?;

        link_tags(&mut tx, created.id, &post.tag_ids).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    async fn get_active_post_by_slug(&self, slug: &str) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1 AND is_active"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    async fn list_posts(&self, active_only: bool, filter: &PostFilter) -> Result<Vec<Post>, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE TRUE"));

        if active_only {
            builder.push(" AND is_active");
        }
        if let Some(tag) = &filter.tag {
            builder
                .push(
                    " AND EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                     WHERE pt.post_id = posts.id AND t.slug = ",
                )
                .push_bind(tag.clone())
                .push(")");
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        let posts = builder.build_query_as::<Post>().fetch_all(&self.pool).await?;

        Ok(posts)
    }

    async fn update_post(&self, id: i64, changes: &PostChanges) -> Result<Post, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts SET
                title = $1,
                slug = $2,
                content = $3,
                is_active = $4,
                translations = $5
            WHERE id = $6
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.content)
        .bind(changes.is_active)
        .bind(Json(&changes.translations))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

        if let Some(tag_ids) = &changes.tag_ids {
            sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_tags(&mut tx, id, tag_ids).await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        // comments and post_tags go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".into()));
        }

        Ok(())
    }

    async fn post_exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn post_exists_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM posts
                WHERE slug = $1
                  AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn tags_for_posts(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = sqlx::query_as::<_, TagLink>(
            r#"
            SELECT pt.post_id AS owner_id, t.id, t.name, t.slug
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.name, t.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_tag_links(links))
    }
}
