use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::skill::{Skill, SkillFilter, SkillInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxSkillRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
    /// Insertion order (ascending id).
    async fn list_skills(&self, filter: &SkillFilter) -> Result<Vec<Skill>, AppError>;
    async fn delete_skill(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let created = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name, logo, is_key_skill, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, logo, is_key_skill, category
            "#,
        )
        .bind(&skill.name)
        .bind(&skill.logo)
        .bind(skill.is_key_skill)
        .bind(skill.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_skills(&self, filter: &SkillFilter) -> Result<Vec<Skill>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, name, logo, is_key_skill, category FROM skills WHERE TRUE",
        );

        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category);
        }
        if let Some(is_key_skill) = filter.is_key_skill {
            builder.push(" AND is_key_skill = ").push_bind(is_key_skill);
        }

        builder.push(" ORDER BY id");

        let skills = builder
            .build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await?;

        Ok(skills)
    }

    async fn delete_skill(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Skill not found".into()));
        }

        Ok(())
    }
}
