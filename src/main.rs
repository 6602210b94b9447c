// src/main.rs

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPool;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use shopcart_service::config::AppConfig;
use shopcart_service::shared::api_error::{json_config, path_config};
use shopcart_service::shopcarts::shopcart_router::configure_routes;
use shopcart_service::shopcarts::shopcart_store::PostgresShopCartStore;
use shopcart_service::AppState;

// Entry point of the Actix Web application.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // RUST_LOG controls verbosity; the service logs at info by default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Failed to load service configuration");

    // Connects to PostgreSQL through a connection pool.
    // The .expect() aborts startup if the database is unreachable.
    let pool = PgPool::connect(&config.database_uri)
        .await
        .expect("Failed to connect to PostgreSQL");

    let store = PostgresShopCartStore::new(pool);
    store
        .ensure_schema()
        .await
        .expect("Failed to create the shopcarts table");

    // Shared application state with the injected store.
    // web::Data shares immutable data across the route handlers.
    let app_state = web::Data::new(AppState {
        store: Arc::new(store),
    });

    tracing::info!("Starting the shopcart service on port {}...", config.port);

    // Configures and starts the HTTP server.
    HttpServer::new(move || {
        App::new()
            // .clone() is needed because the closure is moved
            // and may run several times.
            .app_data(app_state.clone())
            .app_data(json_config())
            .app_data(path_config())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    // Binds the server to the address and port. The '?' propagates errors.
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
