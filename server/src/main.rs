//! Genealogy server: loads settings from the environment (and `.env`), prepares the store, serves the API.
//!
//! Run from repo root: `cargo run -p genealogy-server`

use genealogy_api::{
    app, ensure_database_exists, ensure_tables, load_from_env, AppState, MemoryPersonStore, PgPersonStore,
    StoreBackend,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("genealogy_api=info,tower_http=info")),
        )
        .init();

    let state = match settings.backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_tables(&pool, &settings.schema).await?;
            AppState::new(PgPersonStore::new(pool, settings.schema.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            AppState::new(MemoryPersonStore::new())
        }
    };

    let router = app(state, &settings);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("genealogy server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
