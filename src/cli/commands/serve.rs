use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{Settings, initialize_app_state};
use crate::router::create_router;

pub async fn serve(settings: Settings) -> Result<()> {
    trace!("Entering serve function");
    info!("posgate starting up");
    debug!("Database URL: {}", settings.database.url);
    debug!("Bind address: {}", settings.server.bind_address);

    let bind_address = settings.server.bind_address.clone();

    trace!("Initializing application state");
    let state = initialize_app_state(settings).await?;
    debug!("Application state initialized successfully");

    trace!("Creating application router");
    let app = create_router(state);

    info!("Starting server on {}", bind_address);
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to address {}", bind_address))?;

    info!("posgate API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
