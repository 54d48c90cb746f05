use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{types::Json, PgPool};

use crate::{
    entities::timeline::{TimelineEvent, TimelineEventInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxTimelineRepo,
};

const EVENT_COLUMNS: &str = "id, year, title, description, sort_order, translations";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TimelineRepository: Send + Sync {
    async fn create_event(&self, event: &TimelineEventInsert) -> Result<TimelineEvent, AppError>;
    async fn get_event_by_id(&self, id: i64) -> Result<TimelineEvent, AppError>;
    /// Ascending `sort_order`, ties by id.
    async fn list_events(&self) -> Result<Vec<TimelineEvent>, AppError>;
    async fn update_event(&self, id: i64, event: &TimelineEventInsert) -> Result<TimelineEvent, AppError>;
    async fn delete_event(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxTimelineRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxTimelineRepo { pool }
    }
}

#[async_trait]
impl TimelineRepository for SqlxTimelineRepo {
    async fn create_event(&self, event: &TimelineEventInsert) -> Result<TimelineEvent, AppError> {
        let created = sqlx::query_as::<_, TimelineEvent>(&format!(
            r#"
            INSERT INTO timeline_events (year, title, description, sort_order, translations)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&event.year)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.sort_order)
        .bind(Json(&event.translations))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_event_by_id(&self, id: i64) -> Result<TimelineEvent, AppError> {
        sqlx::query_as::<_, TimelineEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM timeline_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Timeline event not found".into()))
    }

    async fn list_events(&self) -> Result<Vec<TimelineEvent>, AppError> {
        let events = sqlx::query_as::<_, TimelineEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM timeline_events ORDER BY sort_order, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn update_event(&self, id: i64, event: &TimelineEventInsert) -> Result<TimelineEvent, AppError> {
        sqlx::query_as::<_, TimelineEvent>(&format!(
            r#"
            UPDATE timeline_events SET
                year = $1,
                title = $2,
                description = $3,
                sort_order = $4,
                translations = $5
            WHERE id = $6
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&event.year)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.sort_order)
        .bind(Json(&event.translations))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Timeline event not found".into()))
    }

    async fn delete_event(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM timeline_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Timeline event not found".into()));
        }

        Ok(())
    }
}
