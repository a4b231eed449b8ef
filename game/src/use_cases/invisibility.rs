use super::channels::{EventSink, shutdown_requested};
use crate::domain::entities::InvisibilityItem;
use crate::domain::events::PlayerCollect;
use tokio::sync::{broadcast, watch};
use tracing::debug;

/// Waits for a collection on the item's cell, reports it and exits.
pub async fn invisibility_task(
    item: InvisibilityItem,
    mut collects: broadcast::Receiver<PlayerCollect>,
    mut shutdown: watch::Receiver<bool>,
    events: EventSink,
) {
    loop {
        if shutdown_requested(&shutdown) {
            return;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            collect = collects.recv() => match collect {
                Ok(collect) if item.is_collected_by(collect.at) => {
                    debug!(at = ?item.position(), "invisibility item collected");
                    events.emit_all(item.collect());
                    return;
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameEvent, Position};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn when_player_steps_on_item_then_it_is_removed_and_applied() {
        let (collect_tx, collect_rx) = broadcast::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (events_tx, mut events) = mpsc::channel(4);
        let task = tokio::spawn(invisibility_task(
            InvisibilityItem::new(Position::new(3, 2)),
            collect_rx,
            shutdown_rx,
            EventSink::new(events_tx),
        ));

        collect_tx
            .send(PlayerCollect {
                at: Position::new(1, 1),
            })
            .expect("subscribed");
        collect_tx
            .send(PlayerCollect {
                at: Position::new(3, 2),
            })
            .expect("subscribed");

        task.await.expect("task");
        assert_eq!(events.recv().await.map(|e| e.kind()), Some("remove_element"));
        match events.recv().await {
            Some(GameEvent::InvisibilityApplied(applied)) => assert_eq!(applied.duration, 20),
            other => panic!("unexpected {other:?}"),
        }
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn when_shutdown_is_signalled_then_item_task_exits() {
        let (_collect_tx, collect_rx) = broadcast::channel(4);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (events_tx, _events) = mpsc::channel(4);
        let task = tokio::spawn(invisibility_task(
            InvisibilityItem::new(Position::new(3, 2)),
            collect_rx,
            shutdown_rx,
            EventSink::new(events_tx),
        ));

        shutdown_tx.send_replace(true);
        task.await.expect("task");
    }
}
