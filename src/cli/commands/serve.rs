use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::{initialize_app_state, AppConfig, ConfigOverrides};
use crate::router::create_router;

pub async fn serve(overrides: ConfigOverrides) -> Result<()> {
    info!("Movieshelf starting up");

    let config = AppConfig::load_with(overrides)?;
    debug!("Bind address: {}", config.bind_address);

    let state = initialize_app_state(&config).await.inspect_err(|e| {
        error!("Failed to initialize application state: {}", e);
    })?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await.inspect_err(|e| {
        error!("Failed to bind to address {}: {}", config.bind_address, e);
    })?;

    info!("Movieshelf API running on http://{}", config.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
