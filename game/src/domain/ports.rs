use crate::domain::Position;
use crate::domain::world::World;

// Use cases depend on these traits, not on the terminal or the hand-off sockets.

pub trait Renderer {
    fn draw(&mut self, world: &World) -> std::io::Result<()>;
}

/// Forwards the player's new position to the network client. Fire-and-forget.
pub trait PositionReporter {
    fn report(&self, at: Position);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, world: &World) -> std::io::Result<()> {
        (**self).draw(world)
    }
}
