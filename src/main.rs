use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::{connect_to_db, run_migrations};
use crate::infrastructure::db::store::PgContentStore;
use crate::infrastructure::party::client::PartyClient;
use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::infrastructure::redis::client::RedisService;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod testing;
mod workers;
mod workflow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Missing required environment variable")?;

    let db = connect_to_db(&config.database_url).await?;
    run_migrations(&db).await?;

    let redis = RedisService::new(&config.redis_url).await?;
    let queue = RabbitMqService::new(&config.rabbitmq_url).await?;
    let party = PartyClient::new(&config.partykit_url, &config.partykit_room_name)?;
    info!("Party notifications go to {}", party.endpoint());

    let port = config.server_port;
    let state = AppState::new(
        config,
        Arc::new(PgContentStore::new(db)),
        redis,
        queue,
        Arc::new(party),
    );

    workers::workflow::spawn_workflow_worker(state.clone());

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
