mod config;
mod db;
mod domain;
mod error;
mod services;
mod state;
mod time_utils;
mod web;

use crate::config::AppConfig;
use crate::db::{seed, MemoryStore, PgStore, Store};
use crate::state::{AppState, SharedState};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    e
                })?;
            tracing::info!("Database connection established");

            let store = PgStore::new(pool);
            tracing::info!("Running database migrations...");
            store.migrate().await.map_err(|e| {
                tracing::error!("Failed to run database migrations: {}", e);
                e
            })?;
            tracing::info!("Database migrations completed");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_on_start {
        seed::seed_if_empty(store.as_ref()).await?;
    }
    if config.dev_login {
        tracing::warn!("Dev login enabled: /auth/dev-token mints identity tokens for any email");
    }

    let shared: SharedState = Arc::new(AppState {
        store,
        session_key: config.session_key.clone(),
        timezone: config.timezone,
        dev_login: config.dev_login,
    });

    let mut app = Router::new()
        .merge(web::routes(shared))
        .layer(TraceLayer::new_for_http());
    if config.cors_allow_any {
        app = app.layer(CorsLayer::permissive());
    }

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
