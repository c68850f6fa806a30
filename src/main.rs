use anyhow::Context;
use bookstore_checkout::api::HttpStoreApi;
use bookstore_checkout::checkout::{spawn_session_sweeper, AppState};
use bookstore_checkout::config::AppConfig;
use bookstore_checkout::router::create_app_router;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Storefront backend for the book store web client.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "bookstore.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore_checkout=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = AppConfig::load(&args.config).context("loading configuration")?;

    // Initialize application state
    let api = HttpStoreApi::new(&config.api).context("building store api client")?;
    let state = Arc::new(AppState::from_config(Arc::new(api), &config));
    let _sweeper = spawn_session_sweeper(state.clone(), config.server.session_ttl());

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Configure the server address
    let addr = config.server_address()?;
    info!(%addr, api = %config.api.base_url, "storefront listening");

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
