// Channel wiring shared by the game loop and the entity tasks.

use crate::domain::events::{PlayerAlert, PlayerCollect, PlayerState, StarCommand};
use crate::domain::{GameEvent, Position};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::trace;

/// Capacities for the simulation channels.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSettings {
    /// Bounded event queue into the reducer; full means dropped.
    pub event_capacity: usize,
    /// Capacity for monster alerts.
    pub alert_capacity: usize,
    /// Capacity for player state, collect and star command broadcasts.
    pub broadcast_capacity: usize,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            event_capacity: 10,
            alert_capacity: 10,
            broadcast_capacity: 16,
        }
    }
}

/// Non-blocking producer side of the event queue.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<GameEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<GameEvent>) -> Self {
        Self { tx }
    }

    /// Returns false when the event was dropped.
    pub fn emit(&self, event: GameEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                trace!(event = event.kind(), "event queue full, dropping");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                trace!(event = event.kind(), "event queue closed, dropping");
                false
            }
        }
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Sender ends of every simulation channel, owned by the game loop.
pub struct SimulationChannels {
    pub events: EventSink,
    pub player_state: broadcast::Sender<PlayerState>,
    pub player_collect: broadcast::Sender<PlayerCollect>,
    pub alerts: mpsc::Sender<PlayerAlert>,
    pub star_commands: broadcast::Sender<StarCommand>,
    /// Reducer-confirmed monster position fed back to the monster task.
    pub monster_position: watch::Sender<Position>,
    pub shutdown: watch::Sender<bool>,
}

/// Receiver ends handed out once at spawn time.
pub struct SimulationReceivers {
    pub events: mpsc::Receiver<GameEvent>,
    pub alerts: mpsc::Receiver<PlayerAlert>,
    pub monster_position: watch::Receiver<Position>,
}

pub fn simulation_channels(
    settings: ChannelSettings,
    monster_spawn: Position,
) -> (SimulationChannels, SimulationReceivers) {
    let (events_tx, events_rx) = mpsc::channel(settings.event_capacity);
    let (alerts_tx, alerts_rx) = mpsc::channel(settings.alert_capacity);
    let (player_state, _) = broadcast::channel(settings.broadcast_capacity);
    let (player_collect, _) = broadcast::channel(settings.broadcast_capacity);
    let (star_commands, _) = broadcast::channel(settings.broadcast_capacity);
    let (monster_position, monster_position_rx) = watch::channel(monster_spawn);
    let (shutdown, _) = watch::channel(false);

    (
        SimulationChannels {
            events: EventSink::new(events_tx),
            player_state,
            player_collect,
            alerts: alerts_tx,
            star_commands,
            monster_position,
            shutdown,
        },
        SimulationReceivers {
            events: events_rx,
            alerts: alerts_rx,
            monster_position: monster_position_rx,
        },
    )
}

// True once shutdown was requested or the signal owner is gone.
pub fn shutdown_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{DoubleJumpApplied, InvisibilityApplied};

    #[test]
    fn emit_drops_when_queue_is_full() {
        let (tx, mut rx) = mpsc::channel(2);
        let sink = EventSink::new(tx);

        let jump = |jumps| GameEvent::DoubleJumpApplied(DoubleJumpApplied { jumps });
        assert!(sink.emit(jump(1)));
        assert!(sink.emit(jump(2)));
        assert!(!sink.emit(jump(3)));

        assert_eq!(rx.try_recv().unwrap(), jump(1));
        assert_eq!(rx.try_recv().unwrap(), jump(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn emit_reports_drop_when_consumer_is_gone() {
        let (tx, rx) = mpsc::channel(2);
        let sink = EventSink::new(tx);
        drop(rx);

        assert!(!sink.emit(GameEvent::InvisibilityApplied(InvisibilityApplied {
            duration: 20
        })));
    }

    #[test]
    fn late_receiver_still_sees_requested_shutdown() {
        let (tx, _) = watch::channel(false);
        tx.send_replace(true);
        let late = tx.subscribe();

        assert!(shutdown_requested(&late));
    }

    #[test]
    fn dropped_shutdown_owner_counts_as_shutdown() {
        let (tx, rx) = watch::channel(false);
        assert!(!shutdown_requested(&rx));

        drop(tx);
        assert!(shutdown_requested(&rx));
    }
}
