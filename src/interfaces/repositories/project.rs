use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    entities::{
        project::{Project, ProjectChanges, ProjectFilter, ProjectInsert},
        tag::Tag,
    },
    errors::AppError,
    repositories::{
        sqlx_repo::SqlxProjectRepo,
        tag::{group_tag_links, TagLink},
    },
};

const PROJECT_COLUMNS: &str = "id, title, slug, short_description, full_description, thumbnail, \
     repo_link, demo_link, is_featured, category, translations, created_at";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Persists the project and its tag links in one transaction.
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: i64) -> Result<Project, AppError>;
    async fn get_project_by_slug(&self, slug: &str) -> Result<Project, AppError>;
    /// Newest first.
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError>;
    async fn update_project(&self, id: i64, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: i64) -> Result<(), AppError>;
    async fn project_exists_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError>;
    async fn tags_for_projects(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

async fn link_tags(
    tx: &mut Transaction<'_, Postgres>,
    project_id: i64,
    tag_ids: &[i64],
) -> Result<(), AppError> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO project_tags (project_id, tag_id)
        SELECT $1, UNNEST($2::BIGINT[])
        "#,
    )
    .bind(project_id)
    .bind(tag_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (
                title, slug, short_description, full_description, thumbnail,
                repo_link, demo_link, is_featured, category, translations, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.short_description)
        .bind(&project.full_description)
        .bind(&project.thumbnail)
        .bind(&project.repo_link)
        .bind(&project.demo_link)
        .bind(project.is_featured)
        .bind(project.category)
        .bind(Json(&project.translations))
        .bind(project.created_at)
        .fetch_one(&mut *tx)
        .await?;

        link_tags(&mut tx, created.id, &project.tag_ids).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE TRUE"
        ));

        if let Some(featured) = filter.featured {
            builder.push(" AND is_featured = ").push_bind(featured);
        }
        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category);
        }
        if let Some(tag) = &filter.tag {
            builder
                .push(
                    " AND EXISTS (SELECT 1 FROM project_tags pt JOIN tags t ON t.id = pt.tag_id \
                     WHERE pt.project_id = projects.id AND t.slug = ",
                )
                .push_bind(tag.clone())
                .push(")");
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn update_project(&self, id: i64, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET
                title = $1,
                slug = $2,
                short_description = $3,
                full_description = $4,
                thumbnail = $5,
                repo_link = $6,
                demo_link = $7,
                is_featured = $8,
                category = $9,
                translations = $10
            WHERE id = $11
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.short_description)
        .bind(&changes.full_description)
        .bind(&changes.thumbnail)
        .bind(&changes.repo_link)
        .bind(&changes.demo_link)
        .bind(changes.is_featured)
        .bind(changes.category)
        .bind(Json(&changes.translations))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        if let Some(tag_ids) = &changes.tag_ids {
            sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_tags(&mut tx, id, tag_ids).await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }

    async fn project_exists_with_slug(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM projects
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

    async fn tags_for_projects(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = sqlx::query_as::<_, TagLink>(
            r#"
            SELECT pt.project_id AS owner_id, t.id, t.name, t.slug
            FROM project_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.project_id = ANY($1)
            ORDER BY t.name, t.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_tag_links(links))
    }
}
