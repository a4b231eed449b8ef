// Framework bootstrap for the terminal game.

use crate::domain::map::{MapLayout, load_from_file};
use crate::frameworks::config;
use crate::interface_adapters::handoff::{
    HandoffTimeouts, ReconnectDelays, TcpMoveReporter, run_state_sync,
};
use crate::interface_adapters::terminal::{TerminalRenderer, spawn_input_thread};
use crate::use_cases::{GameSettings, Simulation, game_task};

use crossterm::{cursor, execute, terminal};
use std::fs::OpenOptions;
use std::io::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

fn restore_terminal() {
    let _ = execute!(
        std::io::stdout(),
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

fn init_runtime() -> Result<()> {
    let _ = dotenvy::dotenv();

    let log_path = config::log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        restore_terminal();
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));

    tracing::debug!(%log_path, "logging to file");
    Ok(())
}

/// Run the game on the current terminal until the player quits.
pub async fn run(
    layout: MapLayout,
    settings: GameSettings,
    command_addr: String,
    state_addr: String,
) -> Result<()> {
    let mut renderer = TerminalRenderer::new();
    renderer.init()?;

    let (command_tx, command_rx) = mpsc::channel(config::COMMAND_CHANNEL_CAPACITY);
    let stop_input = Arc::new(AtomicBool::new(false));
    let input = match spawn_input_thread(command_tx, stop_input.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            let _ = renderer.cleanup();
            return Err(e);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (snapshot_tx, snapshot_rx) = mpsc::channel(config::SNAPSHOT_CHANNEL_CAPACITY);
    let state_sync = tokio::spawn(run_state_sync(
        state_addr.clone(),
        snapshot_tx,
        ReconnectDelays::default(),
        shutdown_rx,
    ));

    tracing::info!(%command_addr, %state_addr, "game started");
    let sim = Simulation::start(&layout, &settings);
    let outcome = game_task(
        sim,
        command_rx,
        snapshot_rx,
        &mut renderer,
        TcpMoveReporter::new(command_addr, HandoffTimeouts::default()),
        settings.tick_interval,
    )
    .await;

    let _ = shutdown_tx.send(true);
    stop_input.store(true, Ordering::Relaxed);
    let _ = state_sync.await;
    let _ = input.join();
    renderer.cleanup()?;

    let world = outcome?;
    tracing::info!(score = world.score, "game over");
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime()?;

    let map_path = config::map_path();
    let layout = load_from_file(&map_path).map_err(|e| {
        tracing::error!(%map_path, error = %e, "failed to load map");
        std::io::Error::other(format!("failed to load map {map_path}: {e}"))
    })?;

    let settings = GameSettings {
        tick_interval: config::TICK_INTERVAL,
        seed: rand::random(),
        ..GameSettings::default()
    };

    run(layout, settings, config::command_addr(), config::state_addr()).await
}
