use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use warmbook::config::AppConfig;
use warmbook::db;
use warmbook::handlers;
use warmbook::services::notify::log::LogNotifier;
use warmbook::services::store::{BookingStore, MemoryBookingStore, SqliteBookingStore};
use warmbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let availability = config.load_availability()?;
    tracing::info!("schedule: {}", availability.to_human_readable());

    let store: Box<dyn BookingStore> = if config.database_url == ":memory:" {
        tracing::info!("using in-memory booking store");
        Box::new(MemoryBookingStore::new())
    } else {
        tracing::info!("using SQLite booking store (path: {})", config.database_url);
        Box::new(SqliteBookingStore::new(db::init_db(&config.database_url)?))
    };

    let notifier = LogNotifier::new(&config.business_name, &config.business_domain);

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        slots: Box::new(availability),
        notifier: Box::new(notifier),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
