//! alepe-watch HTTP trigger service.
//!
//! Exposes `GET /` (health) and `GET /run` (synchronous pipeline run with
//! identifier overrides). Configuration path and bind address come from
//! the environment.

use std::path::PathBuf;

use alepe_watch::config;
use alepe_watch::error::Result;
use alepe_watch::serve::{AppState, router};

/// Main entry point for the service binary.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config_path =
        PathBuf::from(std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".into()));
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let config = config::load(&config_path);
    log::info!("Loaded configuration from {}", config_path.display());

    let app = router(AppState { config });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("alepe-watch API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
