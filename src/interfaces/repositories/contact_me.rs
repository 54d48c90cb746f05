use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    entities::contact_me::{ContactMeFormInsert, ContactMeMessage},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactMeRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<ContactMeMessage, AppError>;
    /// Newest first.
    async fn list_contact_messages(&self) -> Result<Vec<ContactMeMessage>, AppError>;
    async fn delete_contact_message(&self, id: i64) -> Result<(), AppError>;
}

impl SqlxContactMeRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactMeRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactMeRepo {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<ContactMeMessage, AppError> {
        let created = sqlx::query_as::<_, ContactMeMessage>(
            r#"
            INSERT INTO contact_messages (name, email, message, "timestamp")
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, "timestamp"
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .bind(msg.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMeMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMeMessage>(
            r#"
            SELECT id, name, email, message, "timestamp"
            FROM contact_messages
            ORDER BY "timestamp" DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn delete_contact_message(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| {
                if result.rows_affected() == 0 {
                    Err(AppError::NotFound("Contact message not found".into()))
                } else {
                    Ok(())
                }
            })?
    }
}
