// Framework bootstrap for the sync server runtime.

use crate::frameworks::config;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::SyncService;

use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, map_lines: Vec<String>) -> Result<()> {
    let address = listener.local_addr()?;
    let state = Arc::new(AppState {
        sync: Arc::new(SyncService::new(SystemClock, map_lines)),
    });
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let map_path = config::map_path();
    // A missing map is not fatal; clients then render only what they load locally.
    let map_lines = match config::load_map_lines(&map_path) {
        Ok(lines) => {
            tracing::info!(path = %map_path, lines = lines.len(), "map loaded");
            lines
        }
        Err(e) => {
            tracing::warn!(path = %map_path, error = %e, "failed to load map, serving empty map");
            Vec::new()
        }
    };

    let address = config::listen_addr();
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, map_lines).await
}
