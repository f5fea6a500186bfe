//! sweettrack-shop - bakery storefront and order back-office service
//!
//! Serves the storefront API (catalog, quotes, gallery, order wizard,
//! message suggestions) and the passphrase-protected admin API from one
//! SQLite database.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use sweettrack_common::config::{RootFolderInitializer, TomlConfig};
use sweettrack_common::db::init_database;
use sweettrack_shop::config::{Args, ShopConfig};
use sweettrack_shop::services::suggestions::{DisabledSuggester, GeminiSuggester, MessageSuggester};
use sweettrack_shop::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting SweetTrack shop (sweettrack-shop) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml = TomlConfig::load(args.config.as_deref()).context("Failed to load config file")?;
    let config = ShopConfig::resolve(args, toml);

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let suggester: Arc<dyn MessageSuggester> = match &config.suggestions_api_key {
        Some(key) => {
            info!(model = %config.suggestions_model, "Message suggestions enabled");
            Arc::new(GeminiSuggester::new(
                key.clone(),
                config.suggestions_model.clone(),
                config.suggestions_base_url.clone(),
            )?)
        }
        None => {
            info!("No suggestions API key configured; using stock cake messages");
            Arc::new(DisabledSuggester)
        }
    };

    let state = AppState::new(pool.clone(), &config.admin_passphrase, config.session_ttl, suggester);
    let app = build_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("sweettrack-shop listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
