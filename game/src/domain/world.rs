use crate::domain::events::StarState;
use crate::domain::map::{Element, Grid, LoadMode, MapLayout, load_from_lines};
use crate::domain::Position;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarView {
    pub position: Position,
    pub state: StarState,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterView {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePlayer {
    pub id: String,
    pub name: String,
    pub position: Position,
}

/// One complete state block received from the network client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub self_id: Option<String>,
    pub map_lines: Vec<String>,
    pub players: Vec<RemotePlayer>,
}

/// The single world aggregate. Only the game loop mutates it.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub grid: Grid,
    pub player: Position,
    pub status: String,
    pub invisible_steps: u32,
    pub double_jumps: u32,
    pub score: u64,
    pub monster: Option<MonsterView>,
    pub stars: BTreeMap<String, StarView>,
    pub remote_players: BTreeMap<String, RemotePlayer>,
    pub self_id: Option<String>,
    map_synced: bool,
}

pub fn star_id(index: usize) -> String {
    format!("star_{}", index + 1)
}

impl World {
    pub fn from_layout(layout: &MapLayout) -> Self {
        let stars = layout
            .stars
            .iter()
            .enumerate()
            .map(|(i, at)| {
                (
                    star_id(i),
                    StarView {
                        position: *at,
                        state: StarState::Visible,
                        visible: true,
                    },
                )
            })
            .collect();

        Self {
            grid: layout.grid.clone(),
            player: layout.player_spawn.unwrap_or_default(),
            monster: layout.monster_spawn.map(|at| MonsterView {
                id: crate::domain::entities::monster::MONSTER_ID.to_string(),
                position: at,
            }),
            stars,
            ..Self::default()
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible_steps > 0
    }

    pub fn map_synced(&self) -> bool {
        self.map_synced
    }

    /// Apply a snapshot from the network client. The map is taken only once.
    pub fn apply_snapshot(&mut self, snapshot: SyncSnapshot) {
        if let Some(id) = snapshot.self_id {
            self.self_id = Some(id);
        }

        if !self.map_synced && !snapshot.map_lines.is_empty() {
            let mut grid = load_from_lines(&snapshot.map_lines, LoadMode::Restricted).grid;
            // Items survive only where a local item is still waiting to be collected.
            for at in grid.positions_of(Element::InvisibilityItem) {
                if self.grid.get(at) != Some(Element::InvisibilityItem) {
                    grid.set(at, Element::Empty);
                }
            }
            self.grid = grid;
            self.map_synced = true;
        }

        self.remote_players = snapshot
            .players
            .into_iter()
            .map(|player| (player.id.clone(), player))
            .collect();
    }

    // Remote players other than ourselves.
    pub fn others(&self) -> impl Iterator<Item = &RemotePlayer> {
        self.remote_players
            .values()
            .filter(move |p| self.self_id.as_deref() != Some(p.id.as_str()))
    }
}
