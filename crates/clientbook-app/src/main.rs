use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router, Server};
use clientbook_app::app::api::routes;
use clientbook_app::config::{ConfigHandler, Settings, StoreBackend};
use clientbook_app::store_handler::StoreHandler;
use clientbook_core::config::load_config;
use clientbook_db::db::connection::create_pool;
use clientbook_db::db::migrate::run_migrations;
use clientbook_db::store::{MemoryStore, PgStore, Store};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// ## Summary
/// Opens the configured store backend.
///
/// ## Errors
/// Returns an error if the postgres backend has no URL, migrations fail or the
/// pool cannot be built.
async fn open_store(config: &Settings) -> anyhow::Result<Arc<dyn Store>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config.database.require_url()?;

            if config.database.run_migrations {
                run_migrations(url).await?;
            }

            let pool = create_pool(url, u32::from(config.database.max_connections)).await?;
            tracing::info!("Database connection pool created.");

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting clientbook server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store = open_store(&config).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let origin = config.server.origin();
    let router = Router::new()
        .hoop(StoreHandler { store })
        .hoop(ConfigHandler::new(config))
        .push(routes());

    let server = Server::new(acceptor);
    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        handle.stop_graceful(None);
    });

    tracing::info!(%origin, "Server listening on {bind_addr}");

    server.serve(router).await;

    Ok(())
}
