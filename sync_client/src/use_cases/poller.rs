use crate::domain::{SnapshotPublisher, SyncApi};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

// Fetch authoritative state on a fixed cadence and fan it out.
pub async fn run_poller<A, P>(
    api: Arc<A>,
    client_id: String,
    publisher: Arc<P>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    A: SyncApi + ?Sized,
    P: SnapshotPublisher + ?Sized,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!("poller stopping");
                    break;
                }
            }
            _ = ticker.tick() => {
                match api.get_state(&client_id).await {
                    Ok(snapshot) => {
                        debug!(players = snapshot.players.len(), "state polled");
                        publisher.publish(&client_id, &snapshot).await;
                    }
                    // Retried on the next tick.
                    Err(err) => warn!(error = %err, "state poll failed"),
                }
            }
        }
    }
}
