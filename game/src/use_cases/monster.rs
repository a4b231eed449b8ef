use super::channels::{EventSink, shutdown_requested};
use crate::domain::entities::Monster;
use crate::domain::events::{PlayerAlert, PlayerState};
use crate::domain::{GameEvent, Position};
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Everything the monster task listens to.
pub struct MonsterInbox {
    pub player_state: broadcast::Receiver<PlayerState>,
    pub alerts: mpsc::Receiver<PlayerAlert>,
    /// Position as confirmed by the reducer.
    pub confirmed: watch::Receiver<Position>,
    pub shutdown: watch::Receiver<bool>,
}

pub async fn monster_task(
    mut monster: Monster,
    mut inbox: MonsterInbox,
    events: EventSink,
    mut rng: StdRng,
) {
    let tuning = *monster.tuning();

    let mut movement = tokio::time::interval(tuning.move_interval);
    movement.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let idle = tokio::time::sleep(tuning.idle_timeout);
    tokio::pin!(idle);

    let mut players_open = true;
    let mut alerts_open = true;
    let mut confirmations_open = true;

    loop {
        if shutdown_requested(&inbox.shutdown) {
            break;
        }

        tokio::select! {
            changed = inbox.shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            update = inbox.player_state.recv(), if players_open => match update {
                Ok(state) => {
                    monster.observe_player(state.position, &mut rng);
                    idle.as_mut().reset(Instant::now() + tuning.idle_timeout);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!(skipped, "monster lagged behind player updates");
                }
                Err(broadcast::error::RecvError::Closed) => players_open = false,
            },
            () = &mut idle => {
                let timeout = monster.idle_timeout(&mut rng);
                debug!(monster_id = %timeout.monster_id, message = timeout.message, "monster idle");
                events.emit(GameEvent::MonsterTimeout(timeout));
                idle.as_mut().reset(Instant::now() + tuning.idle_timeout);
            }
            alert = inbox.alerts.recv(), if alerts_open => match alert {
                Some(alert) if alert.issued_at.elapsed() > tuning.alert_window => {
                    debug!(kind = ?alert.kind, "alert went stale before we could react");
                    monster.alert_went_stale(&mut rng);
                }
                Some(alert) => monster.handle_alert(&alert.kind, &mut rng),
                None => alerts_open = false,
            },
            changed = inbox.confirmed.changed(), if confirmations_open => {
                if changed.is_err() {
                    confirmations_open = false;
                } else {
                    let at = *inbox.confirmed.borrow_and_update();
                    monster.confirm_position(at);
                }
            }
            _ = movement.tick() => {
                if let Some(step) = monster.tick(&mut rng) {
                    trace!(from = ?step.old, to = ?step.new, "monster proposes move");
                    events.emit(GameEvent::MonsterMove(step));
                }
            }
        }
    }

    debug!(monster_id = monster.id(), "monster task stopped");
}
