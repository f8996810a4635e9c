use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod upstream;
mod validation;

#[cfg(test)]
mod test_support;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

use crate::{
    config::AppConfig,
    middleware::{JwtVerifier, load_public_key},
    state::AppState,
    upstream::{graphrag::GraphRagClient, groq::GroqClient},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting SkillSync API service");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let public_key = load_public_key(&config.jwt_public_key)?;
    let jwt_verifier = JwtVerifier::new(&public_key, &config.allowed_email_domain)?;

    let recommender = GraphRagClient::new(&config.graphrag_url, config.upstream_timeout())?;
    let text_generator = GroqClient::new(
        &config.groq_api_url,
        &config.groq_api_key,
        &config.groq_model,
        config.upstream_timeout(),
    )?;

    let app_state = AppState::new(
        pool,
        Arc::new(recommender),
        Arc::new(text_generator),
        jwt_verifier,
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
