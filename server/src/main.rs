use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use events_server::config::{Config, StoreBackend};
use events_server::routes::create_routes;
use events_server::store::{EventStore, IdGenerator, MemoryEventStore, PostgresEventStore};
use events_server::AppState;

const DEFAULT_LOG_FILTER: &str = "events_server=info,tower_http=info";

async fn build_store(config: &Config) -> Result<Arc<dyn EventStore>, Box<dyn std::error::Error>> {
    let ids = Arc::new(IdGenerator::new());

    match config.store {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            tracing::info!("Successfully connected to database");

            let store = PostgresEventStore::new(pool, ids);
            store.migrate().await?;
            tracing::info!("Migrations run successfully");

            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory event store; events are lost on restart");
            Ok(Arc::new(MemoryEventStore::new(ids)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    let store = build_store(&config).await?;
    let app = create_routes(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
