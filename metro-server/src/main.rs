use std::process::ExitCode;

use metro_server::config::ServerConfig;
use metro_server::present::FareTable;
use metro_server::router::MetroRouter;
use metro_server::store::GraphStore;
use metro_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = GraphStore::new();

    // An unusable feed at startup is fatal; later reload failures keep the
    // current graph.
    if let Err(e) = store.reload_from(&config.feed_dir, &config.build).await {
        if e.is_fatal() {
            error!(
                error = %e,
                dir = %config.feed_dir.display(),
                "Initial feed load failed"
            );
            return ExitCode::FAILURE;
        }
    }

    if let Some(period) = config.reload_interval {
        let store = store.clone();
        let dir = config.feed_dir.clone();
        let build = config.build.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match store.reload_from(&dir, &build).await {
                    Ok(generation) => info!(generation, "Reloaded metro feed"),
                    Err(e) => warn!(error = %e, "Scheduled feed reload failed"),
                }
            }
        });
    }

    let router = MetroRouter::new(
        store,
        config.path.clone(),
        FareTable::delhi(),
        &config.cache,
    );
    let app = create_router(AppState::new(router));

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %config.addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(
        addr = %config.addr,
        feed_dir = %config.feed_dir.display(),
        "Metro route planner listening"
    );

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
