use crate::domain::Position;
use std::path::Path;
use thiserror::Error;

pub const WALL_GLYPH: char = '▤';
pub const VEGETATION_GLYPH: char = '♣';
pub const MONSTER_GLYPH: char = '☠';
pub const INVISIBILITY_GLYPH: char = '¤';
pub const STAR_GLYPH: char = '★';
pub const PLAYER_GLYPH: char = '☺';

/// Static content of one map cell. Entities are drawn on top of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Element {
    Wall,
    Vegetation,
    #[default]
    Empty,
    InvisibilityItem,
}

impl Element {
    pub fn glyph(self) -> char {
        match self {
            Element::Wall => WALL_GLYPH,
            Element::Vegetation => VEGETATION_GLYPH,
            Element::Empty => ' ',
            Element::InvisibilityItem => INVISIBILITY_GLYPH,
        }
    }

    // Tangible cells block movement.
    pub fn is_tangible(self) -> bool {
        matches!(self, Element::Wall)
    }
}

/// Row-major grid; rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Element>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Element>] {
        &self.rows
    }

    pub fn get(&self, at: Position) -> Option<Element> {
        let y = usize::try_from(at.y).ok()?;
        let x = usize::try_from(at.x).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    // Out-of-bounds cells are never passable.
    pub fn is_passable(&self, at: Position) -> bool {
        self.get(at).is_some_and(|cell| !cell.is_tangible())
    }

    pub fn positions_of(&self, element: Element) -> Vec<Position> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(move |(_, cell)| **cell == element)
                    .map(move |(x, _)| Position::new(x as i32, y as i32))
            })
            .collect()
    }

    pub fn set(&mut self, at: Position, element: Element) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(at.x), usize::try_from(at.y)) else {
            return false;
        };
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = element;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Boot-time load: spawn markers are collected.
    Initial,
    /// Map received from the sync service: the grid only, player spawn ignored.
    Restricted,
}

/// Grid plus the entity spawn points found while parsing.
#[derive(Debug, Clone, Default)]
pub struct MapLayout {
    pub grid: Grid,
    pub player_spawn: Option<Position>,
    pub monster_spawn: Option<Position>,
    pub stars: Vec<Position>,
    pub invisibility_items: Vec<Position>,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
}

pub fn load_from_lines<I, S>(lines: I, mode: LoadMode) -> MapLayout
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut layout = MapLayout::default();
    let mut rows = Vec::new();

    for (y, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        let mut row = Vec::with_capacity(line.len());
        for (x, ch) in line.chars().enumerate() {
            let at = Position::new(x as i32, y as i32);
            let cell = match ch {
                WALL_GLYPH => Element::Wall,
                VEGETATION_GLYPH => Element::Vegetation,
                INVISIBILITY_GLYPH => {
                    if mode == LoadMode::Initial {
                        layout.invisibility_items.push(at);
                    }
                    Element::InvisibilityItem
                }
                MONSTER_GLYPH => {
                    // Only the first marker spawns a monster.
                    if mode == LoadMode::Initial && layout.monster_spawn.is_none() {
                        layout.monster_spawn = Some(at);
                    }
                    Element::Empty
                }
                STAR_GLYPH => {
                    if mode == LoadMode::Initial {
                        layout.stars.push(at);
                    }
                    Element::Empty
                }
                PLAYER_GLYPH => {
                    if mode == LoadMode::Initial {
                        layout.player_spawn = Some(at);
                    }
                    Element::Empty
                }
                _ => Element::Empty,
            };
            row.push(cell);
        }
        rows.push(row);
    }

    layout.grid = Grid::from_rows(rows);
    layout
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<MapLayout, MapError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(load_from_lines(contents.lines(), LoadMode::Initial))
}
