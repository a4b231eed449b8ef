// Messages flowing between the entities, the player and the reducer.

use crate::domain::Position;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarState {
    Visible,
    Invisible,
    Pulsing,
    Charging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    Power,
    Life,
    Score,
}

impl BonusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BonusKind::Power => "power",
            BonusKind::Life => "life",
            BonusKind::Score => "score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarBonus {
    pub kind: BonusKind,
    pub value: u32,
}

/// Random behaviors a bored star can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarAction {
    Charge,
    Pulse,
    Hide,
    EnergyBurst,
}

impl StarAction {
    pub const ALL: [StarAction; 4] = [
        StarAction::Charge,
        StarAction::Pulse,
        StarAction::Hide,
        StarAction::EnergyBurst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StarAction::Charge => "charge",
            StarAction::Pulse => "pulse",
            StarAction::Hide => "hide",
            StarAction::EnergyBurst => "energy_burst",
        }
    }

    // State the star moves to, if the action is a transition.
    pub fn target_state(self) -> Option<StarState> {
        match self {
            StarAction::Charge => Some(StarState::Charging),
            StarAction::Pulse => Some(StarState::Pulsing),
            StarAction::Hide => Some(StarState::Invisible),
            StarAction::EnergyBurst => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarMessageKind {
    SyncPulse,
    ShareEnergy(u32),
    Warning,
}

/// Star-to-star message. The sender is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarMessage {
    pub from: String,
    pub kind: StarMessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarCommandKind {
    ChangeState(StarState),
    Pulse,
    Charge,
    Communicate(StarMessage),
}

/// Out-of-band star command; an empty target addresses every star.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarCommand {
    pub target: String,
    pub kind: StarCommandKind,
}

impl StarCommand {
    pub fn addresses(&self, star_id: &str) -> bool {
        self.target.is_empty() || self.target == star_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub position: Position,
}

/// "The player stepped here": collectibles at this cell react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCollect {
    pub at: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertKind {
    PlayerNearby { at: Position },
    Noise { at: Position },
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAlert {
    pub kind: AlertKind,
    pub issued_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterMove {
    pub monster_id: String,
    pub old: Position,
    pub new: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterCollision {
    pub at: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterTimeout {
    pub monster_id: String,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarCollected {
    pub star_id: String,
    pub at: Position,
    pub bonus: StarBonus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarStateChange {
    pub star_id: String,
    pub at: Position,
    pub old: StarState,
    pub new: StarState,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarPulse {
    pub star_id: String,
    pub at: Position,
    pub visible: bool,
    pub pulse_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarCharged {
    pub star_id: String,
    pub at: Position,
    pub energy: u32,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarTimeout {
    pub star_id: String,
    pub at: Position,
    pub action: StarAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarCommunicate {
    pub star_id: String,
    pub message: StarMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovedKind {
    Star { star_id: String },
    InvisibilityItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveElement {
    pub at: Position,
    pub kind: RemovedKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvisibilityApplied {
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleJumpApplied {
    pub jumps: u32,
}

/// Everything the reducer can be asked to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    MonsterMove(MonsterMove),
    MonsterCollision(MonsterCollision),
    MonsterTimeout(MonsterTimeout),
    StarCollected(StarCollected),
    StarStateChange(StarStateChange),
    StarPulse(StarPulse),
    StarCharged(StarCharged),
    StarTimeout(StarTimeout),
    StarCommunicate(StarCommunicate),
    RemoveElement(RemoveElement),
    InvisibilityApplied(InvisibilityApplied),
    DoubleJumpApplied(DoubleJumpApplied),
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::MonsterMove(_) => "monster_move",
            GameEvent::MonsterCollision(_) => "monster_collision",
            GameEvent::MonsterTimeout(_) => "monster_timeout",
            GameEvent::StarCollected(_) => "star_collected",
            GameEvent::StarStateChange(_) => "star_state_change",
            GameEvent::StarPulse(_) => "star_pulse",
            GameEvent::StarCharged(_) => "star_charged",
            GameEvent::StarTimeout(_) => "star_timeout",
            GameEvent::StarCommunicate(_) => "star_communicate",
            GameEvent::RemoveElement(_) => "remove_element",
            GameEvent::InvisibilityApplied(_) => "invisibility_applied",
            GameEvent::DoubleJumpApplied(_) => "double_jump_applied",
        }
    }
}
