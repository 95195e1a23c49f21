use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;

mod app;
mod config;
mod db;
mod error;
mod models;
mod services;
mod web;

use app::App;
use config::Config;
use error::Result;
use web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (info and above unless RUST_LOG says otherwise)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --config flag
    let config = if args.len() >= 3 && args[1] == "--config" {
        Config::load_from(&PathBuf::from(&args[2]))?
    } else {
        Config::load()?
    };

    tracing::info!("Using database at {}", config.db_path);
    let app = App::new(&config).await?;
    let router = web::router(AppState::new(app)?);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
