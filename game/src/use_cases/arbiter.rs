use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

/// Proof that the holder completed a map-access round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGrant {
    pub ticket: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("map arbiter stopped")]
    ArbiterStopped,
}

/// Cloneable requester handle for the map arbiter.
#[derive(Clone)]
pub struct MapAccess {
    requests: mpsc::Sender<oneshot::Sender<MapGrant>>,
}

impl MapAccess {
    pub async fn acquire(&self) -> Result<MapGrant, AccessError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.requests
            .send(reply_tx)
            .await
            .map_err(|_| AccessError::ArbiterStopped)?;
        reply_rx.await.map_err(|_| AccessError::ArbiterStopped)
    }
}

pub type AccessRequests = mpsc::Receiver<oneshot::Sender<MapGrant>>;

pub fn map_arbiter() -> (MapAccess, AccessRequests) {
    // Capacity 1 keeps grant order equal to request order.
    let (requests, rx) = mpsc::channel(1);
    (MapAccess { requests }, rx)
}

/// Grants every request in arrival order. Stops on shutdown or once all
/// `MapAccess` handles are gone.
pub async fn run_arbiter(mut requests: AccessRequests, mut shutdown: watch::Receiver<bool>) {
    let mut next_ticket: u64 = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            request = requests.recv() => {
                let Some(reply) = request else {
                    break;
                };
                next_ticket += 1;
                // A requester that gave up is not an error.
                let _ = reply.send(MapGrant { ticket: next_ticket });
            }
        }
    }

    debug!(granted = next_ticket, "map arbiter stopped");
}
