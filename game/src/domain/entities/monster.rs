use crate::domain::events::{AlertKind, MonsterMove, MonsterTimeout};
use crate::domain::tuning::MonsterTuning;
use crate::domain::Position;
use rand::Rng;
use std::f64::consts::TAU;

pub const MONSTER_ID: &str = "monster_1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterState {
    Hunting,
    Patrolling,
}

/// The pursuing monster. Its position is authoritative only once the reducer
/// confirms a proposed move through `confirm_position`.
#[derive(Debug, Clone)]
pub struct Monster {
    id: String,
    current: Position,
    destiny: Position,
    last_seen: Position,
    state: MonsterState,
    shift_count: u32,
    // Ticks since the last unconfirmed proposal.
    in_flight: Option<u32>,
    tuning: MonsterTuning,
}

impl Monster {
    pub fn spawn(at: Position, tuning: MonsterTuning) -> Self {
        Self {
            id: MONSTER_ID.to_string(),
            current: at,
            destiny: at.offset(5, 5),
            last_seen: at,
            state: MonsterState::Patrolling,
            shift_count: 0,
            in_flight: None,
            tuning,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.current
    }

    pub fn destiny(&self) -> Position {
        self.destiny
    }

    pub fn last_seen(&self) -> Position {
        self.last_seen
    }

    pub fn state(&self) -> MonsterState {
        self.state
    }

    pub fn tuning(&self) -> &MonsterTuning {
        &self.tuning
    }

    pub fn distance_to(&self, pos: Position) -> f64 {
        self.current.euclidean(pos)
    }

    pub fn can_see(&self, player: Position) -> bool {
        self.distance_to(player) <= self.tuning.sight_radius
    }

    pub fn observe_player<R: Rng>(&mut self, player: Position, rng: &mut R) {
        if self.can_see(player) {
            self.state = MonsterState::Hunting;
            self.last_seen = player;
            self.destiny = player;
        } else if self.state == MonsterState::Hunting {
            self.destiny = self.last_seen;
            if self.distance_to(self.last_seen) < self.tuning.lose_track_distance {
                self.state = MonsterState::Patrolling;
                self.aggressive_patrol_destiny(rng);
            }
        }
    }

    // Idle timer fired without any player update.
    pub fn idle_timeout<R: Rng>(&mut self, rng: &mut R) -> MonsterTimeout {
        let message = if self.state == MonsterState::Hunting {
            self.state = MonsterState::Patrolling;
            self.aggressive_patrol_destiny(rng);
            "Monster lost track of player - entering aggressive patrol"
        } else {
            self.random_destiny(rng);
            "Monster is wandering"
        };
        MonsterTimeout {
            monster_id: self.id.clone(),
            message,
        }
    }

    pub fn handle_alert<R: Rng>(&mut self, alert: &AlertKind, rng: &mut R) {
        match alert {
            AlertKind::PlayerNearby { at } => {
                self.state = MonsterState::Hunting;
                self.last_seen = *at;
                self.destiny = *at;
            }
            AlertKind::Noise { at } => self.destiny = *at,
            AlertKind::Other(_) => self.random_destiny(rng),
        }
    }

    pub fn alert_went_stale<R: Rng>(&mut self, rng: &mut R) {
        self.state = MonsterState::Patrolling;
        self.random_destiny(rng);
    }

    pub fn confirm_position(&mut self, at: Position) {
        self.current = at;
        self.in_flight = None;
    }

    /// Movement tick. Returns the proposed step, if any.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Option<MonsterMove> {
        if !self.should_move() {
            return None;
        }

        if let Some(waited) = self.in_flight {
            if waited < self.tuning.resend_after_ticks {
                self.in_flight = Some(waited + 1);
                return None;
            }
        }

        if self.state == MonsterState::Patrolling && self.distance_to(self.destiny) < 1.0 {
            self.random_destiny(rng);
        }

        let next = self.next_step(self.destiny);
        if next == self.current {
            return None;
        }

        self.in_flight = Some(0);
        Some(MonsterMove {
            monster_id: self.id.clone(),
            old: self.current,
            new: next,
        })
    }

    // Patrolling moves every other tick.
    fn should_move(&mut self) -> bool {
        if self.state == MonsterState::Hunting {
            return true;
        }
        self.shift_count += 1;
        if self.shift_count >= 2 {
            self.shift_count = 0;
            return true;
        }
        false
    }

    fn next_step(&self, target: Position) -> Position {
        let dx = (target.x - self.current.x).signum();
        let dy = (target.y - self.current.y).signum();

        match self.state {
            MonsterState::Hunting => self.current.offset(dx, dy),
            MonsterState::Patrolling if dx != 0 => self.current.offset(dx, 0),
            MonsterState::Patrolling => self.current.offset(0, dy),
        }
    }

    fn random_destiny<R: Rng>(&mut self, rng: &mut R) {
        self.destiny = self.sample_destiny(
            self.tuning.patrol_radius,
            self.tuning.patrol_jitter,
            rng,
        );
    }

    fn aggressive_patrol_destiny<R: Rng>(&mut self, rng: &mut R) {
        self.destiny = self.sample_destiny(
            self.tuning.aggressive_patrol_radius,
            self.tuning.aggressive_patrol_jitter,
            rng,
        );
    }

    // Rejection sampling inside the bounds, then a jitter around the current cell.
    fn sample_destiny<R: Rng>(&self, radius: i32, jitter: i32, rng: &mut R) -> Position {
        let t = &self.tuning;
        for _ in 0..t.max_destiny_tries {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(0.0..f64::from(radius));
            let x = self.current.x + (distance * angle.cos()) as i32;
            let y = self.current.y + (distance * angle.sin()) as i32;
            if (t.min_x..t.max_x).contains(&x) && (t.min_y..t.max_y).contains(&y) {
                return Position::new(x, y);
            }
        }

        self.current.offset(
            rng.gen_range(-jitter..=jitter),
            rng.gen_range(-jitter..=jitter),
        )
    }
}
