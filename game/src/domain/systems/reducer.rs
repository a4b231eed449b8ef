use crate::domain::events::{GameEvent, MonsterCollision, RemovedKind};
use crate::domain::map::Element;
use crate::domain::world::World;
use tracing::{debug, trace};

pub const CAUGHT_MESSAGE: &str = "Caught by the monster!";

/// Apply one event to the world. Returns derived events to enqueue.
pub fn apply(world: &mut World, event: GameEvent) -> Vec<GameEvent> {
    let mut derived = Vec::new();

    match event {
        GameEvent::MonsterMove(mv) => {
            let Some(monster) = world.monster.as_mut().filter(|m| m.id == mv.monster_id) else {
                trace!(monster_id = %mv.monster_id, "move for unknown monster");
                return derived;
            };
            // Rejected moves are simply not applied.
            if !world.grid.is_passable(mv.new) {
                trace!(x = mv.new.x, y = mv.new.y, "monster move blocked");
                return derived;
            }
            monster.position = mv.new;
            if mv.new == world.player {
                derived.push(GameEvent::MonsterCollision(MonsterCollision { at: mv.new }));
            }
        }
        GameEvent::MonsterCollision(_) => {
            world.status = CAUGHT_MESSAGE.to_string();
        }
        GameEvent::InvisibilityApplied(buff) => {
            world.invisible_steps = buff.duration;
            world.status = "Invisibility collected!".to_string();
        }
        GameEvent::DoubleJumpApplied(buff) => {
            world.double_jumps = buff.jumps;
            world.status = format!("Star collected! {} double jumps granted!", buff.jumps);
        }
        GameEvent::StarCollected(collected) => {
            // Already picked up on foot.
            if !world.stars.contains_key(&collected.star_id) {
                trace!(star_id = %collected.star_id, "collection of a consumed star");
                return derived;
            }
            world.score += u64::from(collected.bonus.value);
            world.status = format!(
                "Star collected: +{} {}",
                collected.bonus.value,
                collected.bonus.kind.as_str()
            );
        }
        GameEvent::StarStateChange(change) => {
            if let Some(view) = world.stars.get_mut(&change.star_id) {
                view.state = change.new;
                view.visible = change.visible;
            }
        }
        GameEvent::StarPulse(pulse) => {
            if let Some(view) = world.stars.get_mut(&pulse.star_id) {
                view.visible = pulse.visible;
            }
        }
        GameEvent::RemoveElement(removed) => match removed.kind {
            RemovedKind::Star { star_id } => {
                world.stars.remove(&star_id);
            }
            RemovedKind::InvisibilityItem => {
                world.grid.set(removed.at, Element::Empty);
            }
        },
        other @ (GameEvent::MonsterTimeout(_)
        | GameEvent::StarCharged(_)
        | GameEvent::StarTimeout(_)
        | GameEvent::StarCommunicate(_)) => {
            debug!(event = other.kind(), ?other, "advisory event");
        }
    }

    derived
}
