use crate::domain::events::{GameEvent, InvisibilityApplied, RemoveElement, RemovedKind};
use crate::domain::tuning::INVISIBILITY_STEPS;
use crate::domain::Position;

/// One-shot pickup granting invisible steps.
#[derive(Debug, Clone, Copy)]
pub struct InvisibilityItem {
    position: Position,
}

impl InvisibilityItem {
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_collected_by(&self, at: Position) -> bool {
        at == self.position
    }

    pub fn collect(&self) -> [GameEvent; 2] {
        [
            GameEvent::RemoveElement(RemoveElement {
                at: self.position,
                kind: RemovedKind::InvisibilityItem,
            }),
            GameEvent::InvisibilityApplied(InvisibilityApplied {
                duration: INVISIBILITY_STEPS,
            }),
        ]
    }
}
