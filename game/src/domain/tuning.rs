//! Gameplay tuning for the simulated entities.
//!
//! Keep this separate from runtime configuration (tick rates, channel sizes, addresses).

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct MonsterTuning {
    /// Player positions within this Euclidean distance are seen.
    pub sight_radius: f64,

    /// Hunting ends once the monster is this close to the last sighting.
    pub lose_track_distance: f64,

    /// Without player updates for this long the monster gives up or wanders.
    pub idle_timeout: Duration,

    /// Alerts older than this are stale when dequeued.
    pub alert_window: Duration,

    /// Movement tick.
    pub move_interval: Duration,

    pub patrol_radius: i32,
    pub aggressive_patrol_radius: i32,
    pub patrol_jitter: i32,
    pub aggressive_patrol_jitter: i32,

    /// Patrol destinations are sampled inside `[min, max)` on both axes.
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub max_destiny_tries: u32,

    /// Ticks to wait for a proposed move to be confirmed before proposing again.
    pub resend_after_ticks: u32,
}

impl Default for MonsterTuning {
    fn default() -> Self {
        Self {
            sight_radius: 25.0,
            lose_track_distance: 0.5,
            idle_timeout: Duration::from_secs(3),
            alert_window: Duration::from_millis(500),
            move_interval: Duration::from_millis(30),
            patrol_radius: 10,
            aggressive_patrol_radius: 15,
            patrol_jitter: 1,
            aggressive_patrol_jitter: 2,
            min_x: 1,
            max_x: 79,
            min_y: 1,
            max_y: 29,
            max_destiny_tries: 10,
            resend_after_ticks: 5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StarTuning {
    pub visible_duration: Duration,
    pub invisible_duration: Duration,
    pub pulse_interval: Duration,

    /// Pulses before a pulsing star settles back to visible.
    pub max_pulses: u32,

    pub charge_duration: Duration,

    /// Idle time before the star picks a random behavior.
    pub behavior_timeout: Duration,

    pub charge_energy: u32,
    pub burst_energy: u32,

    /// Manhattan distance at which a nearby player makes the star pulse.
    pub pulse_distance: i32,

    /// Manhattan distance beyond which a pulsing star calms down.
    pub calm_distance: i32,
}

impl Default for StarTuning {
    fn default() -> Self {
        Self {
            visible_duration: Duration::from_secs(8),
            invisible_duration: Duration::from_secs(4),
            pulse_interval: Duration::from_secs(2),
            max_pulses: 10,
            charge_duration: Duration::from_secs(10),
            behavior_timeout: Duration::from_secs(15),
            charge_energy: 100,
            burst_energy: 50,
            pulse_distance: 1,
            calm_distance: 3,
        }
    }
}

/// Buff sizes granted by collectibles.
pub const INVISIBILITY_STEPS: u32 = 20;
pub const STAR_DOUBLE_JUMPS: u32 = 3;

/// Chance that a player step makes noise the monster can hear.
pub const NOISE_CHANCE: f64 = 0.2;
