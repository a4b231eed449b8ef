use crate::domain::Position;
use crate::domain::events::StarState;
use crate::domain::tuning::STAR_DOUBLE_JUMPS;
use crate::domain::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Move the player one cell, or two while double jumps remain.
/// Returns the new position, or `None` when the way is blocked.
pub fn step(world: &mut World, direction: Direction) -> Option<Position> {
    let (dx, dy) = direction.delta();
    let one = world.player.offset(dx, dy);

    let target = if world.double_jumps > 0 {
        let two = world.player.offset(dx * 2, dy * 2);
        if world.grid.is_passable(one) && world.grid.is_passable(two) {
            world.double_jumps -= 1;
            world.status = if world.double_jumps == 0 {
                "Last double jump used!".to_string()
            } else {
                format!("Double jump! {} left", world.double_jumps)
            };
            two
        } else if world.grid.is_passable(one) {
            world.status = format!("Double jump blocked! {} left", world.double_jumps);
            one
        } else {
            return None;
        }
    } else if world.grid.is_passable(one) {
        one
    } else {
        return None;
    };

    world.player = target;

    if pick_up_star(world, target) {
        return Some(target);
    }

    if world.invisible_steps > 0 {
        world.invisible_steps -= 1;
        world.status = if world.invisible_steps == 0 {
            "Invisibility expired".to_string()
        } else {
            format!("Invisible: {} moves left", world.invisible_steps)
        };
    }

    Some(target)
}

// A star under the player is consumed on the spot unless it is hidden.
// Pulse flicker does not hide it. The pickup does not count as an invisible step.
fn pick_up_star(world: &mut World, at: Position) -> bool {
    let Some(id) = world
        .stars
        .iter()
        .find(|(_, view)| view.position == at && view.state != StarState::Invisible)
        .map(|(id, _)| id.clone())
    else {
        return false;
    };

    world.stars.remove(&id);
    world.double_jumps = STAR_DOUBLE_JUMPS;
    world.status = format!("Star collected! {STAR_DOUBLE_JUMPS} double jumps granted!");
    true
}

pub fn interact(world: &mut World) {
    world.status = format!("Interacting at ({}, {})", world.player.x, world.player.y);
}
