// Framework bootstrap for the network client runtime.

use crate::domain::{LocalPlayer, SyncApi};
use crate::frameworks::config;
use crate::interface_adapters::clients::HttpSyncClient;
use crate::interface_adapters::handoff::{
    StateBroadcaster, serve_commands, serve_state_subscribers,
};
use crate::use_cases::{CommandSender, RetryPolicy, run_poller, run_position_reporter};

use std::{io::Result, sync::Arc};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};

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

// Register, then relay hand-off traffic until shutdown. Registration failure is fatal.
pub async fn run<A>(
    api: Arc<A>,
    player_name: &str,
    command_listener: TcpListener,
    state_listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    A: SyncApi + 'static,
{
    let client_id = api.register(player_name).await.map_err(|e| {
        tracing::error!(name = player_name, error = %e, "registration failed");
        std::io::Error::other(format!("failed to register with sync server: {e}"))
    })?;
    tracing::info!(%client_id, name = player_name, "registered");

    let (position_tx, position_rx) = mpsc::channel(config::POSITION_CHANNEL_CAPACITY);
    let broadcaster = Arc::new(StateBroadcaster::new(config::SUBSCRIBER_WRITE_TIMEOUT));

    tracing::info!(
        command_addr = %command_listener.local_addr()?,
        state_addr = %state_listener.local_addr()?,
        "hand-off listening"
    );

    let reporter = tokio::spawn(run_position_reporter(
        CommandSender::new(api.clone(), RetryPolicy::default()),
        LocalPlayer::new(client_id.clone(), player_name),
        position_rx,
    ));
    tokio::spawn(run_poller(
        api,
        client_id,
        broadcaster.clone(),
        config::POLL_INTERVAL,
        shutdown.clone(),
    ));
    tokio::spawn(serve_commands(
        command_listener,
        position_tx,
        shutdown.clone(),
    ));
    tokio::spawn(serve_state_subscribers(
        state_listener,
        broadcaster,
        shutdown.clone(),
    ));

    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
    tracing::info!("shutting down");
    reporter.abort();
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let server_url = config::sync_server_url();
    let timeout = config::request_timeout();
    let api = HttpSyncClient::new(server_url.clone(), timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize sync client: {e}")))?;
    tracing::debug!(
        %server_url,
        request_timeout_ms = timeout.as_millis(),
        "sync client configured"
    );

    let command_addr = config::command_addr();
    let command_listener = TcpListener::bind(&command_addr)
        .await
        .inspect_err(|e| tracing::error!(address = %command_addr, error = %e, "failed to bind"))?;
    let state_addr = config::state_addr();
    let state_listener = TcpListener::bind(&state_addr)
        .await
        .inspect_err(|e| tracing::error!(address = %state_addr, error = %e, "failed to bind"))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    run(
        Arc::new(api),
        &config::player_name(),
        command_listener,
        state_listener,
        shutdown_rx,
    )
    .await
}
