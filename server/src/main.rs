use anyhow::Context;
use dapur_server::config::{Config, StoreBackend};
use dapur_server::storage::ThumbnailStorage;
use dapur_server::store::{MemoryStore, PgStore};
use dapur_server::{api, db, telemetry, AppState};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("failed to render OpenAPI spec")?;
        println!("{}", spec);
        return Ok(());
    }

    telemetry::init_telemetry();

    let config = Config::from_env().context("invalid configuration")?;
    let thumbnails = ThumbnailStorage::new(&config.storage_dir, &config.public_url);

    let state = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = db::create_pool(database_url).context("failed to set up database")?;
            AppState::new(Arc::new(PgStore::new(pool)), thumbnails)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, data will not survive a restart");
            AppState::new(Arc::new(MemoryStore::new()), thumbnails)
        }
    };

    let app = dapur_server::app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI available at {}/swagger-ui/", config.public_url);
    tracing::info!(
        "OpenAPI spec available at {}/api-docs/openapi.json",
        config.public_url
    );

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
