use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod domain;
mod http;
mod metrics;
mod models;
mod store;

use config::{AppConfig, StoreKind};
use domain::order::{OrderRepository, OrderService};
use store::{InMemoryOrderRepository, PgOrderRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,northwind_orders=debug")),
        )
        .init();

    tracing::info!("🚀 Starting Northwind orders service");

    let config = AppConfig::from_env()?;

    // === 1. Order store ===
    let repository: Arc<dyn OrderRepository> = match config.store {
        StoreKind::Postgres => {
            tracing::info!("Connecting to PostgreSQL...");
            Arc::new(PgOrderRepository::connect(&config.database).await?)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory order store, data is lost on exit");
            Arc::new(InMemoryOrderRepository::new())
        }
    };

    let service = web::Data::new(OrderService::new(repository));

    // === 2. Prometheus metrics ===
    let metrics = web::Data::new(metrics::Metrics::new()?);
    let registry = Arc::new(metrics.registry().clone());
    let metrics_server =
        metrics::start_metrics_server(registry, config.http_host.clone(), config.metrics_port);

    // === 3. Order API ===
    tracing::info!(
        store = config.store.as_str(),
        "🌐 Serving orders on http://{}:{}/orders",
        config.http_host,
        config.http_port
    );

    let api_server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(metrics.clone())
            .configure(http::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))?
    .run();

    tokio::try_join!(api_server, metrics_server)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
