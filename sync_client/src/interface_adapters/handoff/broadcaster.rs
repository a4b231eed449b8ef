use crate::domain::{SnapshotPublisher, StateSnapshot};
use crate::interface_adapters::handoff::wire::render_snapshot;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

struct Subscriber {
    id: u64,
    writer: OwnedWriteHalf,
}

// Registry of connected state subscribers. Add, remove and broadcast share one lock.
pub struct StateBroadcaster {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
    write_timeout: Duration,
}

impl StateBroadcaster {
    pub fn new(write_timeout: Duration) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            write_timeout,
        }
    }

    pub async fn add(&self, writer: OwnedWriteHalf) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.lock().await;
        subscribers.push(Subscriber { id, writer });
        info!(subscriber = id, total = subscribers.len(), "state subscriber added");
        id
    }

    // Dropping the write half closes our side of the connection.
    pub async fn remove(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.lock().await;
        let before = subscribers.len();
        subscribers.retain(|sub| sub.id != id);
        before != subscribers.len()
    }

    pub async fn len(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // Write the payload to every subscriber; failed or slow ones are dropped.
    // Returns the number of subscribers still connected.
    pub async fn broadcast(&self, payload: &[u8]) -> usize {
        let mut subscribers = self.subscribers.lock().await;
        let mut kept = Vec::with_capacity(subscribers.len());
        for mut sub in subscribers.drain(..) {
            match tokio::time::timeout(self.write_timeout, sub.writer.write_all(payload)).await {
                Ok(Ok(())) => kept.push(sub),
                Ok(Err(e)) => {
                    debug!(subscriber = sub.id, error = %e, "state subscriber dropped");
                }
                Err(_) => {
                    debug!(subscriber = sub.id, "state subscriber timed out");
                }
            }
        }
        *subscribers = kept;
        subscribers.len()
    }
}

#[async_trait]
impl SnapshotPublisher for StateBroadcaster {
    async fn publish(&self, self_id: &str, snapshot: &StateSnapshot) {
        let payload = render_snapshot(self_id, snapshot);
        self.broadcast(payload.as_bytes()).await;
    }
}

// Subscribers never send anything, so EOF or a read error means the peer left.
async fn remove_on_disconnect(
    broadcaster: Arc<StateBroadcaster>,
    id: u64,
    mut reader: OwnedReadHalf,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut buf = [0u8; 256];
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return;
                }
            }
            read = reader.read(&mut buf) => match read {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            },
        }
    }
    if broadcaster.remove(id).await {
        debug!(subscriber = id, "state subscriber disconnected");
    }
}

// Accept game connections as state subscribers.
pub async fn serve_state_subscribers(
    listener: TcpListener,
    broadcaster: Arc<StateBroadcaster>,
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
                Ok((stream, _peer)) => {
                    let _ = stream.set_nodelay(true);
                    let (reader, writer) = stream.into_split();
                    let id = broadcaster.add(writer).await;
                    tokio::spawn(remove_on_disconnect(
                        broadcaster.clone(),
                        id,
                        reader,
                        shutdown.clone(),
                    ));
                }
                Err(e) => warn!(error = %e, "state accept failed"),
            },
        }
    }
    debug!("state listener stopped");
}
