use super::arbiter::{map_arbiter, run_arbiter};
use super::channels::{
    ChannelSettings, SimulationChannels, SimulationReceivers, simulation_channels,
};
use super::invisibility::invisibility_task;
use super::monster::{MonsterInbox, monster_task};
use super::star::{StarInbox, star_task};
use crate::domain::entities::{InvisibilityItem, Monster, Star};
use crate::domain::events::{AlertKind, PlayerAlert, PlayerCollect, PlayerState};
use crate::domain::map::MapLayout;
use crate::domain::ports::{PositionReporter, Renderer};
use crate::domain::systems::player::{self, Direction};
use crate::domain::systems::reducer;
use crate::domain::tuning::{MonsterTuning, NOISE_CHANCE, StarTuning};
use crate::domain::world::star_id;
use crate::domain::{GameEvent, Position, SyncSnapshot, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace};

/// What the local player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Move(Direction),
    Interact,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    /// Event polling and redraw cadence.
    pub tick_interval: Duration,
    pub channels: ChannelSettings,
    pub monster: MonsterTuning,
    pub star: StarTuning,
    /// Seeds every random choice in the simulation.
    pub seed: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            channels: ChannelSettings::default(),
            monster: MonsterTuning::default(),
            star: StarTuning::default(),
            seed: 0,
        }
    }
}

/// The world plus the entity tasks feeding it. The only writer of `World`.
pub struct Simulation {
    world: World,
    channels: SimulationChannels,
    events: mpsc::Receiver<GameEvent>,
    tasks: Vec<JoinHandle<()>>,
    rng: StdRng,
}

impl Simulation {
    /// Build the world from the layout and spawn one task per entity.
    pub fn start(layout: &MapLayout, settings: &GameSettings) -> Self {
        let world = World::from_layout(layout);
        let monster_spawn = layout.monster_spawn.unwrap_or_default();
        let (channels, receivers) = simulation_channels(settings.channels, monster_spawn);
        let SimulationReceivers {
            events,
            alerts,
            monster_position,
        } = receivers;

        let mut tasks = Vec::new();
        let (access, requests) = map_arbiter();
        tasks.push(tokio::spawn(run_arbiter(
            requests,
            channels.shutdown.subscribe(),
        )));

        if let Some(at) = layout.monster_spawn {
            let inbox = MonsterInbox {
                player_state: channels.player_state.subscribe(),
                alerts,
                confirmed: monster_position,
                shutdown: channels.shutdown.subscribe(),
            };
            tasks.push(tokio::spawn(monster_task(
                Monster::spawn(at, settings.monster),
                inbox,
                channels.events.clone(),
                StdRng::seed_from_u64(settings.seed.wrapping_add(1)),
            )));
        }

        for (index, at) in layout.stars.iter().enumerate() {
            let inbox = StarInbox {
                player_state: channels.player_state.subscribe(),
                player_collect: channels.player_collect.subscribe(),
                commands: channels.star_commands.subscribe(),
                shutdown: channels.shutdown.subscribe(),
            };
            let seed = settings.seed.wrapping_add(2 + index as u64);
            tasks.push(tokio::spawn(star_task(
                Star::new(star_id(index), *at, settings.star),
                inbox,
                channels.events.clone(),
                access.clone(),
                StdRng::seed_from_u64(seed),
            )));
        }

        for at in &layout.invisibility_items {
            tasks.push(tokio::spawn(invisibility_task(
                InvisibilityItem::new(*at),
                channels.player_collect.subscribe(),
                channels.shutdown.subscribe(),
                channels.events.clone(),
            )));
        }

        info!(
            stars = layout.stars.len(),
            items = layout.invisibility_items.len(),
            monster = layout.monster_spawn.is_some(),
            "simulation started"
        );

        Self {
            world,
            channels,
            events,
            tasks,
            rng: StdRng::seed_from_u64(settings.seed),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns false when the player asked to quit.
    pub fn handle_command<P: PositionReporter + ?Sized>(
        &mut self,
        command: PlayerCommand,
        reporter: &P,
    ) -> bool {
        match command {
            PlayerCommand::Quit => return false,
            PlayerCommand::Interact => player::interact(&mut self.world),
            PlayerCommand::Move(direction) => {
                if let Some(at) = player::step(&mut self.world, direction) {
                    self.player_moved(at, reporter);
                }
            }
        }
        true
    }

    fn player_moved<P: PositionReporter + ?Sized>(&mut self, at: Position, reporter: &P) {
        trace!(x = at.x, y = at.y, "player moved");
        // No subscribers just means no entities left.
        let _ = self.channels.player_state.send(PlayerState { position: at });
        let _ = self.channels.player_collect.send(PlayerCollect { at });
        reporter.report(at);

        if self.rng.gen_bool(NOISE_CHANCE) {
            let alert = PlayerAlert {
                kind: AlertKind::Noise { at },
                issued_at: Instant::now(),
            };
            if self.channels.alerts.try_send(alert).is_err() {
                trace!("alert dropped");
            }
        }
    }

    /// Reduce at most one pending event. Returns whether one was processed.
    pub fn process_next_event(&mut self) -> bool {
        let Ok(event) = self.events.try_recv() else {
            return false;
        };

        let monster_moved = matches!(event, GameEvent::MonsterMove(_));
        let derived = reducer::apply(&mut self.world, event);
        if monster_moved {
            if let Some(monster) = &self.world.monster {
                self.channels.monster_position.send_replace(monster.position);
            }
        }
        self.channels.events.emit_all(derived);
        true
    }

    pub fn apply_snapshot(&mut self, snapshot: SyncSnapshot) {
        let had_map = self.world.map_synced();
        self.world.apply_snapshot(snapshot);
        if !had_map && self.world.map_synced() {
            info!("map received from sync service");
        }
    }

    /// Signal every entity task to stop and wait for them.
    pub async fn shutdown(self) -> World {
        self.channels.shutdown.send_replace(true);
        for task in self.tasks {
            if let Err(err) = task.await {
                error!(error = %err, "entity task failed");
            }
        }
        self.world
    }
}

/// Fixed-step game loop: one event and one redraw per tick, player commands
/// and sync snapshots as they arrive. Ends on `Quit` or when input closes.
pub async fn game_task<R, P>(
    mut sim: Simulation,
    mut commands: mpsc::Receiver<PlayerCommand>,
    mut snapshots: mpsc::Receiver<SyncSnapshot>,
    mut renderer: R,
    reporter: P,
    tick_interval: Duration,
) -> std::io::Result<World>
where
    R: Renderer,
    P: PositionReporter,
{
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut snapshots_open = true;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let keep_going = match command {
                    Some(command) => sim.handle_command(command, &reporter),
                    None => false,
                };
                if !keep_going {
                    debug!("player quit");
                    break;
                }
            }
            snapshot = snapshots.recv(), if snapshots_open => match snapshot {
                Some(snapshot) => sim.apply_snapshot(snapshot),
                None => snapshots_open = false,
            },
            _ = ticker.tick() => {
                sim.process_next_event();
                if let Err(err) = renderer.draw(sim.world()) {
                    error!(error = %err, "render failed");
                    sim.shutdown().await;
                    return Err(err);
                }
            }
        }
    }

    Ok(sim.shutdown().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{MonsterMove, StarCommand, StarCommandKind, StarState};
    use crate::domain::entities::monster::MONSTER_ID;
    use crate::domain::map::{Element, LoadMode, load_from_lines};
    use crate::domain::systems::reducer::CAUGHT_MESSAGE;
    use crate::domain::world::RemotePlayer;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingReporter {
        reported: Arc<Mutex<Vec<Position>>>,
    }

    impl PositionReporter for RecordingReporter {
        fn report(&self, at: Position) {
            self.reported.lock().unwrap().push(at);
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
    }

    impl Renderer for CountingRenderer {
        fn draw(&mut self, _world: &World) -> std::io::Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    fn start(lines: &[&str]) -> Simulation {
        let layout = load_from_lines(lines, LoadMode::Initial);
        Simulation::start(&layout, &GameSettings::default())
    }

    // Let entity tasks run until `n` events went through the reducer.
    async fn pump(sim: &mut Simulation, n: usize) {
        let mut processed = 0;
        for _ in 0..200 {
            if sim.process_next_event() {
                processed += 1;
                if processed == n {
                    return;
                }
            } else {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
        panic!("only {processed} of {n} events arrived");
    }

    #[tokio::test]
    async fn when_player_moves_then_entities_and_reporter_hear_about_it() {
        let mut sim = start(&["▤▤▤▤▤", "▤☺  ▤", "▤▤▤▤▤"]);
        let mut states = sim.channels.player_state.subscribe();
        let reporter = RecordingReporter::default();

        assert!(sim.handle_command(PlayerCommand::Move(Direction::Right), &reporter));

        assert_eq!(sim.world().player, Position::new(2, 1));
        assert_eq!(
            states.try_recv().expect("broadcast"),
            PlayerState {
                position: Position::new(2, 1)
            }
        );
        assert_eq!(*reporter.reported.lock().unwrap(), vec![Position::new(2, 1)]);
        sim.shutdown().await;
    }

    #[tokio::test]
    async fn when_move_is_blocked_then_nothing_is_reported() {
        let mut sim = start(&["▤▤▤", "▤☺▤", "▤▤▤"]);
        let reporter = RecordingReporter::default();

        assert!(sim.handle_command(PlayerCommand::Move(Direction::Up), &reporter));

        assert_eq!(sim.world().player, Position::new(1, 1));
        assert!(reporter.reported.lock().unwrap().is_empty());
        sim.shutdown().await;
    }

    #[tokio::test]
    async fn when_quit_is_requested_then_handle_command_says_stop() {
        let mut sim = start(&["☺"]);

        assert!(!sim.handle_command(PlayerCommand::Quit, &RecordingReporter::default()));
        sim.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn when_player_steps_on_invisibility_item_then_world_gets_the_buff() {
        let mut sim = start(&["▤▤▤▤▤", "▤☺¤ ▤", "▤▤▤▤▤"]);

        sim.handle_command(
            PlayerCommand::Move(Direction::Right),
            &RecordingReporter::default(),
        );
        pump(&mut sim, 2).await;

        let world = sim.shutdown().await;
        assert_eq!(world.invisible_steps, 20);
        assert_eq!(world.grid.get(Position::new(2, 1)), Some(Element::Empty));
    }

    #[tokio::test]
    async fn when_player_walks_onto_a_pulsing_star_then_it_is_picked_up() {
        let mut sim = start(&["▤▤▤▤▤▤", "▤☺ ★ ▤", "▤▤▤▤▤▤"]);
        let reporter = RecordingReporter::default();

        sim.handle_command(PlayerCommand::Move(Direction::Right), &reporter);
        pump(&mut sim, 1).await;
        assert_eq!(sim.world().stars["star_1"].state, StarState::Pulsing);

        sim.handle_command(PlayerCommand::Move(Direction::Right), &reporter);

        let world = sim.shutdown().await;
        assert_eq!(world.player, Position::new(3, 1));
        assert!(world.stars.is_empty());
        assert_eq!(world.double_jumps, 3);
        assert_eq!(world.status, "Star collected! 3 double jumps granted!");
    }

    #[tokio::test]
    async fn when_monster_move_hits_a_wall_then_its_confirmed_position_stays() {
        let mut sim = start(&["▤▤▤▤▤", "▤☠ ☺▤", "▤▤▤▤▤"]);
        let mut confirmed = sim.channels.monster_position.subscribe();

        sim.channels.events.emit(GameEvent::MonsterMove(MonsterMove {
            monster_id: MONSTER_ID.to_string(),
            old: Position::new(1, 1),
            new: Position::new(0, 1),
        }));
        assert!(sim.process_next_event());

        assert!(confirmed.has_changed().expect("sender alive"));
        assert_eq!(*confirmed.borrow_and_update(), Position::new(1, 1));
        sim.shutdown().await;
    }

    #[tokio::test]
    async fn when_monster_reaches_player_then_collision_follows() {
        let mut sim = start(&["▤▤▤▤▤", "▤☠☺ ▤", "▤▤▤▤▤"]);

        sim.channels.events.emit(GameEvent::MonsterMove(MonsterMove {
            monster_id: MONSTER_ID.to_string(),
            old: Position::new(1, 1),
            new: Position::new(2, 1),
        }));
        assert!(sim.process_next_event());
        assert_eq!(*sim.channels.monster_position.borrow(), Position::new(2, 1));

        assert!(sim.process_next_event());
        assert_eq!(sim.world().status, CAUGHT_MESSAGE);
        sim.shutdown().await;
    }

    #[tokio::test]
    async fn when_queue_is_empty_then_tick_is_a_no_op() {
        let mut sim = start(&["☺"]);

        assert!(!sim.process_next_event());
        sim.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn when_star_is_told_to_charge_then_world_shows_it() {
        let mut sim = start(&["▤▤▤▤▤▤", "▤☺  ★▤", "▤▤▤▤▤▤"]);

        sim.channels
            .star_commands
            .send(StarCommand {
                target: "star_1".to_string(),
                kind: StarCommandKind::Charge,
            })
            .expect("star subscribed");
        pump(&mut sim, 1).await;

        let world = sim.shutdown().await;
        let view = world.stars.get("star_1").expect("star view");
        assert_eq!(view.state, StarState::Charging);
    }

    #[tokio::test(start_paused = true)]
    async fn when_game_task_runs_then_it_draws_and_stops_on_quit() {
        let sim = start(&["▤▤▤▤▤", "▤☺  ▤", "▤▤▤▤▤"]);
        let (command_tx, command_rx) = mpsc::channel(8);
        let (snapshot_tx, snapshot_rx) = mpsc::channel(8);
        let reporter = RecordingReporter::default();
        let mut renderer = CountingRenderer::default();

        snapshot_tx
            .send(SyncSnapshot {
                self_id: Some("C000001".to_string()),
                map_lines: Vec::new(),
                players: vec![RemotePlayer {
                    id: "C000002".to_string(),
                    name: "Bob".to_string(),
                    position: Position::new(3, 1),
                }],
            })
            .await
            .expect("loop alive");
        command_tx
            .send(PlayerCommand::Move(Direction::Right))
            .await
            .expect("loop alive");
        let quit = command_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(180)).await;
            let _ = quit.send(PlayerCommand::Quit).await;
        });

        let world = game_task(
            sim,
            command_rx,
            snapshot_rx,
            &mut renderer,
            reporter.clone(),
            Duration::from_millis(50),
        )
        .await
        .expect("game loop");

        assert!(renderer.frames >= 3);
        assert_eq!(world.player, Position::new(2, 1));
        assert_eq!(world.others().count(), 1);
        assert_eq!(*reporter.reported.lock().unwrap(), vec![Position::new(2, 1)]);
    }
}
