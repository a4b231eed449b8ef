use crate::domain::events::{
    BonusKind, DoubleJumpApplied, GameEvent, RemoveElement, RemovedKind, StarAction, StarBonus,
    StarCharged, StarCollected, StarCommandKind, StarCommunicate, StarMessageKind, StarPulse,
    StarState, StarStateChange, StarTimeout,
};
use crate::domain::tuning::{STAR_DOUBLE_JUMPS, StarTuning};
use crate::domain::Position;
use rand::Rng;

/// Reward granted for collecting a star in the given state.
pub fn reward_for(state: StarState, energy: u32) -> StarBonus {
    match state {
        StarState::Pulsing => StarBonus {
            kind: BonusKind::Power,
            value: 300,
        },
        StarState::Charging => StarBonus {
            kind: BonusKind::Life,
            value: 1,
        },
        StarState::Visible | StarState::Invisible => StarBonus {
            kind: BonusKind::Score,
            value: 100 + energy * 10,
        },
    }
}

/// Collectible star. Methods that change `state` assume the caller already
/// completed a map-access round-trip.
#[derive(Debug, Clone)]
pub struct Star {
    id: String,
    position: Position,
    state: StarState,
    visible: bool,
    energy: u32,
    pulse_count: u32,
    last_player: Option<Position>,
    tuning: StarTuning,
}

impl Star {
    pub fn new(id: impl Into<String>, position: Position, tuning: StarTuning) -> Self {
        Self {
            id: id.into(),
            position,
            state: StarState::Visible,
            visible: true,
            energy: 0,
            pulse_count: 0,
            last_player: None,
            tuning,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> StarState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn pulse_count(&self) -> u32 {
        self.pulse_count
    }

    pub fn last_player(&self) -> Option<Position> {
        self.last_player
    }

    pub fn tuning(&self) -> &StarTuning {
        &self.tuning
    }

    // How long the current visibility phase lasts.
    pub fn visibility_period(&self) -> std::time::Duration {
        if self.visible {
            self.tuning.visible_duration
        } else {
            self.tuning.invisible_duration
        }
    }

    /// Record the player position and return the transition it calls for.
    pub fn observe_player(&mut self, player: Position) -> Option<StarState> {
        self.last_player = Some(player);
        let distance = player.manhattan(self.position);
        if distance <= self.tuning.pulse_distance && self.state != StarState::Pulsing {
            Some(StarState::Pulsing)
        } else if distance > self.tuning.calm_distance && self.state == StarState::Pulsing {
            Some(StarState::Visible)
        } else {
            None
        }
    }

    pub fn can_collect(&self, at: Position) -> bool {
        at == self.position && self.visible && self.state == StarState::Visible
    }

    /// Events announcing the collection. The star is done afterwards.
    pub fn collect(&self) -> Vec<GameEvent> {
        vec![
            GameEvent::StarCollected(StarCollected {
                star_id: self.id.clone(),
                at: self.position,
                bonus: reward_for(self.state, self.energy),
            }),
            GameEvent::RemoveElement(RemoveElement {
                at: self.position,
                kind: RemovedKind::Star {
                    star_id: self.id.clone(),
                },
            }),
            GameEvent::DoubleJumpApplied(DoubleJumpApplied {
                jumps: STAR_DOUBLE_JUMPS,
            }),
        ]
    }

    pub fn transition(&mut self, new: StarState) -> GameEvent {
        let old = self.state;
        self.state = new;
        match new {
            StarState::Visible | StarState::Charging => self.visible = true,
            StarState::Invisible => self.visible = false,
            StarState::Pulsing => {}
        }
        GameEvent::StarStateChange(StarStateChange {
            star_id: self.id.clone(),
            at: self.position,
            old,
            new,
            visible: self.visible,
        })
    }

    pub fn toggle_visibility(&mut self) -> GameEvent {
        let next = if self.visible {
            StarState::Invisible
        } else {
            StarState::Visible
        };
        self.transition(next)
    }

    pub fn pulse(&mut self) -> Vec<GameEvent> {
        self.visible = !self.visible;
        self.pulse_count += 1;
        let mut events = vec![GameEvent::StarPulse(StarPulse {
            star_id: self.id.clone(),
            at: self.position,
            visible: self.visible,
            pulse_count: self.pulse_count,
        })];
        if self.pulse_count >= self.tuning.max_pulses {
            self.pulse_count = 0;
            events.push(self.transition(StarState::Visible));
        }
        events
    }

    pub fn complete_charge(&mut self) -> Vec<GameEvent> {
        self.energy += self.tuning.charge_energy;
        vec![self.charged_event(), self.transition(StarState::Visible)]
    }

    pub fn energy_burst(&mut self) -> GameEvent {
        self.energy += self.tuning.burst_energy;
        self.charged_event()
    }

    pub fn pick_timeout_action<R: Rng>(rng: &mut R) -> StarAction {
        StarAction::ALL[rng.gen_range(0..StarAction::ALL.len())]
    }

    pub fn timeout_event(&self, action: StarAction) -> GameEvent {
        GameEvent::StarTimeout(StarTimeout {
            star_id: self.id.clone(),
            at: self.position,
            action,
        })
    }

    /// Apply a command. Returns the transition it calls for plus events to emit after it.
    pub fn handle_command(&mut self, kind: &StarCommandKind) -> (Option<StarState>, Vec<GameEvent>) {
        match kind {
            StarCommandKind::ChangeState(state) => (Some(*state), Vec::new()),
            StarCommandKind::Pulse if self.state != StarState::Pulsing => {
                (Some(StarState::Pulsing), Vec::new())
            }
            StarCommandKind::Charge if self.state != StarState::Charging => {
                (Some(StarState::Charging), Vec::new())
            }
            StarCommandKind::Pulse | StarCommandKind::Charge => (None, Vec::new()),
            StarCommandKind::Communicate(message) => {
                let next = match message.kind {
                    StarMessageKind::SyncPulse => Some(StarState::Pulsing),
                    StarMessageKind::ShareEnergy(amount) => {
                        self.energy += amount / 2;
                        None
                    }
                    StarMessageKind::Warning => Some(StarState::Charging),
                };
                let event = GameEvent::StarCommunicate(StarCommunicate {
                    star_id: self.id.clone(),
                    message: message.clone(),
                });
                (next, vec![event])
            }
        }
    }

    fn charged_event(&self) -> GameEvent {
        GameEvent::StarCharged(StarCharged {
            star_id: self.id.clone(),
            at: self.position,
            energy: self.energy,
            duration: self.tuning.charge_duration,
        })
    }
}
