use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use portfolio_content::{
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    handlers::system::START_TIME,
    routes::configure_routes,
    settings::{AppConfig, StoreKind},
    shared_repos::SharedRepositories,
    telemetry::init_tracing,
    AppState,
};

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

async fn build_repositories(config: &AppConfig) -> anyhow::Result<SharedRepositories> {
    match config.store {
        StoreKind::Postgres => {
            let pool = create_pool(config)
                .await
                .context("Failed to create database connection pool")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Ok(SharedRepositories::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; content is lost on shutdown");
            Ok(SharedRepositories::in_memory())
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            init_tracing(cfg.is_production());
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    once_cell::sync::Lazy::force(&START_TIME);

    let repos = build_repositories(&config).await?;
    let app_state = web::Data::new(AppState::new(&config, repos)?);

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let cors_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&cors_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count.max(1))
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run();

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => tracing::info!("Server stopped"),
    }

    Ok(())
}
