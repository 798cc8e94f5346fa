//! Task board server.
//!
//! Serves the JSON API under /api/v1 and the HTML pages at the root,
//! backed by a single SQLite database.

mod auth;
mod config;
mod routes;
mod state;

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tb_core::db::Database;
use tb_core::export::CsvExporter;

use crate::auth::{EnvCredentials, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_path = config::database_path();
    tracing::info!("Using database: {database_path}");
    let db = Database::open(&database_path)?;

    let state = AppState::new(
        db,
        Box::new(EnvCredentials::from_env()),
        SessionStore::new(config::session_ttl_hours()),
        CsvExporter::new(config::csv_delimiter()),
    );

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::tasks::router())
        .merge(routes::categories::router())
        .merge(routes::pages::router())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config::port()));
    tracing::info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
