//! Destructible blocks

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::events::EventBus;

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    /// Breaks on the first hit
    #[default]
    Sand,
    /// Cracks on the first hit, breaks on the second
    Stone,
}

impl BlockKind {
    /// Number of hit-stages before destruction
    pub fn stage_count(self) -> usize {
        match self {
            BlockKind::Sand => 1,
            BlockKind::Stone => 2,
        }
    }
}

/// What a single hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Block advanced to the given visual stage and is still collidable
    Damaged { stage: usize },
    /// Final stage reached; the score was published
    Destroyed { score: u32 },
    /// Block was already destroyed
    Ignored,
}

/// A block entity
#[derive(Debug)]
pub struct Block {
    pub id: u32,
    pub kind: BlockKind,
    pub rect: Aabb,
    pub score: u32,
    stage: Cell<usize>,
    active: Cell<bool>,
}

impl Block {
    pub fn new(id: u32, kind: BlockKind, rect: Aabb, score: u32) -> Self {
        Self {
            id,
            kind,
            rect,
            score,
            stage: Cell::new(0),
            active: Cell::new(true),
        }
    }

    /// Current hit-stage, in `[0, stage_count)` while active
    pub fn stage(&self) -> usize {
        self.stage.get()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Advance one hit-stage; on the last one publish the score and deactivate
    pub fn hit(&self, events: &EventBus) -> HitOutcome {
        if !self.active.get() {
            return HitOutcome::Ignored;
        }

        let stage = self.stage.get() + 1;
        let stages = self.kind.stage_count();
        debug_assert!(stage <= stages, "hit-stage past the end of the sequence");

        if stage >= stages {
            self.stage.set(0);
            self.active.set(false);
            events.publish(self.score);
            return HitOutcome::Destroyed { score: self.score };
        }

        self.stage.set(stage);
        HitOutcome::Damaged { stage }
    }

    /// Back to intact and collidable, whatever happened before
    pub fn reset(&self) {
        self.stage.set(0);
        self.active.set(true);
    }
}
