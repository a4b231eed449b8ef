use crate::interface_adapters::handoff::wire::{OK_REPLY, parse_move_line};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

// Accept game connections and forward MOVE positions to the reporter.
pub async fn serve_commands(
    listener: TcpListener,
    positions: mpsc::Sender<(i32, i32)>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    trace!(%peer, "command connection accepted");
                    tokio::spawn(handle_connection(stream, positions.clone()));
                }
                Err(e) => warn!(error = %e, "command accept failed"),
            },
        }
    }
    debug!("command listener stopped");
}

async fn handle_connection(stream: TcpStream, positions: mpsc::Sender<(i32, i32)>) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    // Reset or close from the peer ends the session normally.
    while let Ok(Some(line)) = lines.next_line().await {
        let Some((x, y)) = parse_move_line(&line) else {
            trace!(line = %line, "ignored hand-off line");
            continue;
        };
        // The reply is a handshake only; it does not wait for the RPC.
        if writer.write_all(OK_REPLY).await.is_err() {
            break;
        }
        if positions.send((x, y)).await.is_err() {
            debug!("position reporter gone");
            break;
        }
    }
}
