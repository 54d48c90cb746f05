use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;

use crate::{
    entities::tag::{Tag, TagInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxTagRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create_tag(&self, tag: &TagInsert) -> Result<Tag, AppError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, AppError>;
    async fn get_tag_by_slug(&self, slug: &str) -> Result<Tag, AppError>;
    async fn tag_exists_with_slug(&self, slug: &str) -> Result<bool, AppError>;
    /// Returns the ids from `ids` that have no tag row.
    async fn missing_tag_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError>;
    async fn delete_tag(&self, id: i64) -> Result<(), AppError>;
}

/// One row of a `*_tags` join expanded with the tag itself.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TagLink {
    pub owner_id: i64,
    #[sqlx(flatten)]
    pub tag: Tag,
}

/// Groups join rows by owner; tags keep the query order (by name).
pub(crate) fn group_tag_links(links: Vec<TagLink>) -> HashMap<i64, Vec<Tag>> {
    let mut grouped: HashMap<i64, Vec<Tag>> = HashMap::new();
    for link in links {
        grouped.entry(link.owner_id).or_default().push(link.tag);
    }
    grouped
}

impl SqlxTagRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxTagRepo { pool }
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepo {
    async fn create_tag(&self, tag: &TagInsert) -> Result<Tag, AppError> {
        let created = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            "#,
        )
        .bind(&tag.name)
        .bind(&tag.slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    async fn get_tag_by_slug(&self, slug: &str) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".into()))
    }

    async fn tag_exists_with_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tags WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn missing_tag_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let missing: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT requested.id
            FROM UNNEST($1::BIGINT[]) AS requested(id)
            WHERE NOT EXISTS (SELECT 1 FROM tags t WHERE t.id = requested.id)
            ORDER BY requested.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(missing)
    }

    async fn delete_tag(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tag not found".into()));
        }

        Ok(())
    }
}
