//! Catalog API - product catalog REST server

use axum_helpers::server::{close_postgres, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::{handlers, CatalogService, HnbRateClient, PgProductRepository};
use std::time::Duration;
use tracing::info;

mod api;
mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");
    let db =
        database::postgres::connect_from_config_with_retry(config.postgres.clone(), None).await?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;

    // Wire up the catalog domain
    let repository = PgProductRepository::new(db.clone());
    let rates = HnbRateClient::with_base_url(config.rate_api_url.clone())?;
    let service = CatalogService::new(repository, rates);

    // Build REST router
    let api_routes = handlers::router(service);
    let router = axum_helpers::create_router::<handlers::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(config.app))
        .merge(api::health::router(db.clone()));

    info!("Starting Catalog API on port {}", config.server.port);

    // Run server with graceful shutdown
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing PostgreSQL connections");
        close_postgres(db, "catalog").await;
    })
    .await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
