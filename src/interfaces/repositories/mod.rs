use async_trait::async_trait;

use crate::errors::AppError;

pub mod comment;
pub mod contact_me;
pub mod memory;
pub mod post;
pub mod project;
pub mod skill;
pub mod sqlx_repo;
pub mod tag;
pub mod timeline;

/// Store liveness probe used by `/health`.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
}
