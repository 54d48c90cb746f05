use async_trait::async_trait;
use sqlx::PgPool;

use crate::{errors::AppError, repositories::HealthCheck};

#[derive(Clone)]
pub struct SqlxRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxTagRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSkillRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCommentRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactMeRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxTimelineRepo {
    pub pool: PgPool,
}

impl SqlxRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxRepo { pool }
    }
}

#[async_trait]
impl HealthCheck for SqlxRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }
}
