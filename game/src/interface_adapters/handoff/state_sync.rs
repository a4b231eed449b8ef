use super::wire::SnapshotParser;
use crate::domain::SyncSnapshot;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy)]
pub struct ReconnectDelays {
    pub after_failed_dial: Duration,
    pub after_close: Duration,
}

impl Default for ReconnectDelays {
    fn default() -> Self {
        Self {
            after_failed_dial: Duration::from_millis(500),
            after_close: Duration::from_millis(300),
        }
    }
}

// Sleep unless shutdown arrives first. Returns false on shutdown.
async fn pause(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        changed = shutdown.changed() => changed.is_ok() && !*shutdown.borrow(),
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Subscribe to the network client's state broadcaster and forward every
/// complete snapshot to the game loop. Reconnects until shutdown.
pub async fn run_state_sync(
    addr: String,
    snapshots: mpsc::Sender<SyncSnapshot>,
    delays: ReconnectDelays,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let stream = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            connected = TcpStream::connect(&addr) => connected,
        };

        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                trace!(error = %e, %addr, "state hand-off dial failed");
                if !pause(delays.after_failed_dial, &mut shutdown).await {
                    break;
                }
                continue;
            }
        };

        info!(%addr, "subscribed to state hand-off");
        if !forward_snapshots(stream, &snapshots, &mut shutdown).await {
            break;
        }
        debug!(%addr, "state hand-off closed, reconnecting");
        if !pause(delays.after_close, &mut shutdown).await {
            break;
        }
    }
    debug!("state sync stopped");
}

// Returns false when the loop should stop for good.
async fn forward_snapshots(
    stream: TcpStream,
    snapshots: &mpsc::Sender<SyncSnapshot>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    let mut lines = BufReader::new(stream).lines();
    let mut parser = SnapshotParser::new();

    loop {
        let line = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return false;
                }
                continue;
            }
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                if let Some(snapshot) = parser.feed(&line) {
                    if snapshots.send(snapshot).await.is_err() {
                        return false;
                    }
                }
            }
            Ok(None) => return true,
            Err(e) => {
                trace!(error = %e, "state hand-off read failed");
                return true;
            }
        }
    }
}
