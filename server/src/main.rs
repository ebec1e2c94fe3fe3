#![recursion_limit = "256"]

mod config;
mod routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing `.env` is normal in deployed environments.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "travel-log server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), config::ServerError> {
    let config = config::ServerConfig::from_env()?;
    match &config.backend {
        Ok(backend) => tracing::info!(url = %backend.url, bucket = %backend.storage_bucket, "backend configured"),
        Err(e) => tracing::warn!(error = %e, "backend not configured; the client will run offline"),
    }

    let app = routes::leptos_app(config.backend.clone().ok())?;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(config::ServerError::Io)?;

    tracing::info!(port = config.port, "travel-log listening");
    axum::serve(listener, app).await.map_err(config::ServerError::Io)
}
