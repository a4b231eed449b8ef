use super::arbiter::MapAccess;
use super::channels::{EventSink, shutdown_requested};
use crate::domain::entities::Star;
use crate::domain::events::{PlayerCollect, PlayerState, StarCommand, StarState};
use crate::domain::tuning::StarTuning;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

/// Everything a star task listens to.
pub struct StarInbox {
    pub player_state: broadcast::Receiver<PlayerState>,
    pub player_collect: broadcast::Receiver<PlayerCollect>,
    pub commands: broadcast::Receiver<StarCommand>,
    pub shutdown: watch::Receiver<bool>,
}

// Deadlines for the star timers. `None` means disarmed.
struct StarClock {
    tuning: StarTuning,
    visibility: Option<Instant>,
    pulse: Option<Instant>,
    charge: Option<Instant>,
    behavior: Instant,
}

impl StarClock {
    fn start(star: &Star) -> Self {
        let now = Instant::now();
        let mut clock = Self {
            tuning: *star.tuning(),
            visibility: None,
            pulse: None,
            charge: None,
            behavior: now + star.tuning().behavior_timeout,
        };
        clock.entered(star, now);
        clock
    }

    // Visibility only cycles while visible or invisible.
    fn entered(&mut self, star: &Star, now: Instant) {
        match star.state() {
            StarState::Visible | StarState::Invisible => {
                self.visibility = Some(now + star.visibility_period());
                self.pulse = None;
                self.charge = None;
            }
            StarState::Pulsing => {
                self.visibility = None;
                self.pulse = self.pulse.or(Some(now + self.tuning.pulse_interval));
                self.charge = None;
            }
            StarState::Charging => {
                self.visibility = None;
                self.pulse = None;
                self.charge = Some(now + self.tuning.charge_duration);
            }
        }
    }

    fn touch(&mut self) {
        self.behavior = Instant::now() + self.tuning.behavior_timeout;
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// Map-access round-trip, then the state change. Returns false once the arbiter is gone.
async fn change_state(
    star: &mut Star,
    clock: &mut StarClock,
    access: &MapAccess,
    events: &EventSink,
    new: StarState,
) -> bool {
    if let Err(err) = access.acquire().await {
        debug!(star_id = star.id(), error = %err, "state change skipped");
        return false;
    }
    events.emit(star.transition(new));
    clock.entered(star, Instant::now());
    true
}

pub async fn star_task(
    mut star: Star,
    mut inbox: StarInbox,
    events: EventSink,
    access: MapAccess,
    mut rng: StdRng,
) {
    let mut clock = StarClock::start(&star);
    let mut players_open = true;
    let mut collects_open = true;
    let mut commands_open = true;

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
                    clock.touch();
                    if let Some(next) = star.observe_player(state.position) {
                        change_state(&mut star, &mut clock, &access, &events, next).await;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!(star_id = star.id(), skipped, "star lagged behind player updates");
                }
                Err(broadcast::error::RecvError::Closed) => players_open = false,
            },
            collect = inbox.player_collect.recv(), if collects_open => match collect {
                Ok(collect) if star.can_collect(collect.at) => {
                    debug!(star_id = star.id(), state = ?star.state(), "star collected");
                    events.emit_all(star.collect());
                    return;
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => collects_open = false,
            },
            command = inbox.commands.recv(), if commands_open => match command {
                Ok(command) if command.addresses(star.id()) => {
                    clock.touch();
                    let (next, follow_up) = star.handle_command(&command.kind);
                    if let Some(next) = next {
                        change_state(&mut star, &mut clock, &access, &events, next).await;
                    }
                    events.emit_all(follow_up);
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => commands_open = false,
            },
            () = sleep_until(clock.behavior) => {
                let action = Star::pick_timeout_action(&mut rng);
                match action.target_state() {
                    Some(next) => {
                        change_state(&mut star, &mut clock, &access, &events, next).await;
                    }
                    None => {
                        events.emit(star.energy_burst());
                    }
                }
                events.emit(star.timeout_event(action));
                clock.touch();
            }
            () = wait_until(clock.visibility) => {
                clock.visibility = None;
                if access.acquire().await.is_ok() {
                    events.emit(star.toggle_visibility());
                    clock.entered(&star, Instant::now());
                }
            }
            () = wait_until(clock.pulse) => {
                clock.pulse = None;
                if access.acquire().await.is_ok() {
                    events.emit_all(star.pulse());
                    clock.entered(&star, Instant::now());
                }
            }
            () = wait_until(clock.charge) => {
                clock.charge = None;
                if access.acquire().await.is_ok() {
                    events.emit_all(star.complete_charge());
                    clock.entered(&star, Instant::now());
                }
            }
        }
    }

    debug!(star_id = star.id(), "star task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{StarCommandKind, StarMessage, StarMessageKind};
    use crate::domain::{GameEvent, Position};
    use crate::use_cases::arbiter::{map_arbiter, run_arbiter};
    use rand::SeedableRng;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;

    const AT: Position = Position { x: 10, y: 5 };

    struct Harness {
        player_state: broadcast::Sender<PlayerState>,
        player_collect: broadcast::Sender<PlayerCollect>,
        commands: broadcast::Sender<StarCommand>,
        shutdown: watch::Sender<bool>,
        events: mpsc::Receiver<GameEvent>,
        task: JoinHandle<()>,
    }

    impl Harness {
        fn new() -> Self {
            let (player_state, player_rx) = broadcast::channel(16);
            let (player_collect, collect_rx) = broadcast::channel(16);
            let (commands, commands_rx) = broadcast::channel(16);
            let (shutdown, shutdown_rx) = watch::channel(false);
            let (events_tx, events) = mpsc::channel(256);

            let (access, requests) = map_arbiter();
            tokio::spawn(run_arbiter(requests, shutdown.subscribe()));

            let task = tokio::spawn(star_task(
                Star::new("star_1", AT, StarTuning::default()),
                StarInbox {
                    player_state: player_rx,
                    player_collect: collect_rx,
                    commands: commands_rx,
                    shutdown: shutdown_rx,
                },
                EventSink::new(events_tx),
                access,
                StdRng::seed_from_u64(5),
            ));

            Self {
                player_state,
                player_collect,
                commands,
                shutdown,
                events,
                task,
            }
        }

        async fn next_event(&mut self) -> GameEvent {
            tokio::time::timeout(Duration::from_secs(60), self.events.recv())
                .await
                .expect("event in time")
                .expect("queue open")
        }

        async fn next_state_change(&mut self) -> (StarState, bool) {
            loop {
                if let GameEvent::StarStateChange(change) = self.next_event().await {
                    return (change.new, change.visible);
                }
            }
        }

        fn command(&self, target: &str, kind: StarCommandKind) {
            self.commands
                .send(StarCommand {
                    target: target.to_string(),
                    kind,
                })
                .expect("star subscribed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn when_visible_period_ends_then_star_hides() {
        let mut h = Harness::new();
        let started = Instant::now();

        let change = h.next_state_change().await;

        assert_eq!(change, (StarState::Invisible, false));
        assert!(started.elapsed() >= Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn when_player_is_adjacent_then_star_pulses() {
        let mut h = Harness::new();
        let started = Instant::now();

        h.player_state
            .send(PlayerState {
                position: Position::new(11, 5),
            })
            .expect("star subscribed");

        assert_eq!(h.next_state_change().await.0, StarState::Pulsing);

        let pulse = loop {
            if let GameEvent::StarPulse(pulse) = h.next_event().await {
                break pulse;
            }
        };
        assert_eq!(pulse.pulse_count, 1);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn when_pulsing_player_walks_away_then_star_calms_down() {
        let mut h = Harness::new();

        h.player_state
            .send(PlayerState { position: AT })
            .expect("star subscribed");
        assert_eq!(h.next_state_change().await.0, StarState::Pulsing);

        h.player_state
            .send(PlayerState {
                position: Position::new(20, 20),
            })
            .expect("star subscribed");
        assert_eq!(h.next_state_change().await, (StarState::Visible, true));
    }

    #[tokio::test(start_paused = true)]
    async fn when_collected_at_its_cell_then_star_rewards_and_exits() {
        let mut h = Harness::new();

        h.player_collect
            .send(PlayerCollect { at: AT })
            .expect("star subscribed");

        let kinds = [
            h.next_event().await.kind(),
            h.next_event().await.kind(),
            h.next_event().await.kind(),
        ];
        assert_eq!(
            kinds,
            ["star_collected", "remove_element", "double_jump_applied"]
        );
        tokio::time::timeout(Duration::from_secs(1), h.task)
            .await
            .expect("exited")
            .expect("task");
    }

    #[tokio::test(start_paused = true)]
    async fn when_collected_elsewhere_then_star_keeps_running() {
        let mut h = Harness::new();

        h.player_collect
            .send(PlayerCollect {
                at: Position::new(1, 1),
            })
            .expect("star subscribed");

        assert_eq!(h.next_state_change().await.0, StarState::Invisible);
        assert!(!h.task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn when_charge_command_targets_star_then_it_charges_and_settles() {
        let mut h = Harness::new();

        h.command("star_9", StarCommandKind::Pulse);
        h.command("star_1", StarCommandKind::Charge);

        assert_eq!(h.next_state_change().await, (StarState::Charging, true));

        let charged = loop {
            if let GameEvent::StarCharged(charged) = h.next_event().await {
                break charged;
            }
        };
        assert_eq!(charged.energy, 100);
        assert_eq!(h.next_state_change().await.0, StarState::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn when_broadcast_communication_arrives_then_star_reacts_and_reports() {
        let mut h = Harness::new();

        h.command(
            "",
            StarCommandKind::Communicate(StarMessage {
                from: "star_2".to_string(),
                kind: StarMessageKind::Warning,
            }),
        );

        assert_eq!(h.next_state_change().await.0, StarState::Charging);
        assert_eq!(h.next_event().await.kind(), "star_communicate");
    }

    #[tokio::test(start_paused = true)]
    async fn when_left_alone_then_star_picks_a_behavior() {
        let mut h = Harness::new();
        let started = Instant::now();

        let timeout = loop {
            if let GameEvent::StarTimeout(timeout) = h.next_event().await {
                break timeout;
            }
        };

        assert_eq!(timeout.star_id, "star_1");
        assert!(started.elapsed() >= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn when_shutdown_is_signalled_then_task_exits() {
        let h = Harness::new();

        h.shutdown.send_replace(true);

        tokio::time::timeout(Duration::from_secs(1), h.task)
            .await
            .expect("stopped in time")
            .expect("task");
    }
}
