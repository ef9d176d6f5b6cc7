//! Against AI coordinator server entry point.

use std::error::Error;
use std::sync::Arc;

use againstai_adjudication::{AdjudicationClient, build_backend};
use againstai_api::config::Config;
use againstai_api::routes;
use againstai_api::state::AppState;
use againstai_core::clock::SystemClock;
use againstai_core::rng::SystemRng;
use againstai_lobby::domain::scenarios::ScenarioDeck;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Against AI coordinator");

    let config = Config::from_env()?;

    // Adjudication backend and scenario deck.
    let backend = build_backend(config.backend, &config.backend_settings)?;
    let client = AdjudicationClient::new(backend).with_deadline(config.backend_settings.timeout);
    let deck = ScenarioDeck::load(&config.scenarios_file, config.settings.max_text_length);

    let app_state = AppState::new(
        config.settings,
        client,
        deck,
        Arc::new(SystemClock),
        Box::new(SystemRng),
        Box::new(SystemRng),
    );

    let app = routes::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr()?;
    tracing::info!(
        %addr,
        min_players = config.settings.min_players,
        max_players = config.settings.max_players,
        "Listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
