use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use timetable::auth;
use timetable::config::AppConfig;
use timetable::db::{SqliteStorage, Storage};
use timetable::server::create_router;
use timetable::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TIMETABLE_CONFIG").ok())
        .map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("could not load config")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level.as_tracing())
        .init();

    info!(
        config = ?config_path,
        solver = %config.solver.url,
        slot_minutes = config.scheduler.slot_duration_minutes,
        "Starting timetable server"
    );

    let storage = Arc::new(
        SqliteStorage::open(&config.database.path)
            .with_context(|| format!("could not open database at {}", config.database.path))?,
    );

    match &config.auth.bootstrap_admin {
        Some(admin) => {
            auth::ensure_bootstrap_admin(storage.as_ref(), admin)
                .context("could not create bootstrap admin")?;
        }
        None => warn!("No bootstrap admin configured; only regular users can sign up"),
    }

    let shared: Arc<dyn Storage> = storage.clone();
    let state = Arc::new(AppState::new(shared, &config).context("could not build solver client")?);
    let app = create_router(state.clone());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("could not bind to {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutting down");
    drop(state);
    match Arc::try_unwrap(storage) {
        Ok(storage) => storage.close().context("could not close database")?,
        Err(_) => warn!("Storage still referenced at shutdown, leaving it to be dropped"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
