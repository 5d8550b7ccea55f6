use std::sync::Arc;

use reconnect_onboarding::config::HostConfig;
use reconnect_onboarding::error::Error;
use reconnect_onboarding::onboarding::{
    NoPlaceLookup, OnboardingRouteState, onboarding_routes, spawn_session_sweeper,
};
use reconnect_onboarding::store::{LibSqlBackend, ProfileStore};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = HostConfig::from_env()?;

    eprintln!("Reconnect onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/onboarding/sessions", config.port);
    eprintln!("   Database: {}", config.db_path.display());

    serve(config).await?;
    Ok(())
}

async fn serve(config: HostConfig) -> Result<(), Error> {
    let store: Arc<dyn ProfileStore> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);

    let state = OnboardingRouteState::new(store, Arc::new(NoPlaceLookup), config.defaults);
    spawn_session_sweeper(state.clone(), config.session_idle);
    let app = onboarding_routes(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Onboarding server started");
    axum::serve(listener, app).await?;
    Ok(())
}
