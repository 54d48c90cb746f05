use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::settings::AppConfig;

const MAX_CONNECT_RETRIES: u32 = 5;

/// Connects to Postgres, retrying with exponential backoff while the
/// database is still coming up.
pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    let mut wait_seconds = 2;

    loop {
        match PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                info!(max_connections = config.db_max_connections, "Database connection established.");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_CONNECT_RETRIES => {
                attempt += 1;
                warn!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    attempt, MAX_CONNECT_RETRIES, e, wait_seconds
                );
                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;
                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied.");
    Ok(())
}
