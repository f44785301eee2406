//! Levels: a container of blocks that is either active or parked

use std::cell::Cell;

use super::block::Block;
use super::collision::Aabb;
use crate::error::ConfigError;
use crate::settings::{LevelLayout, ScoreTable};

#[derive(Debug)]
pub struct Level {
    pub index: usize,
    pub name: String,
    blocks: Vec<Block>,
    active: Cell<bool>,
}

impl Level {
    /// Build a level from an authored layout. Block ids are sequential from
    /// `first_id` in layout order.
    pub fn from_layout(index: usize, layout: &LevelLayout, scores: &ScoreTable, first_id: u32) -> Self {
        let blocks = layout
            .blocks
            .iter()
            .zip(first_id..)
            .map(|(spec, id)| {
                Block::new(
                    id,
                    spec.kind,
                    Aabb::new(spec.center, spec.half_extents),
                    scores.for_kind(spec.kind),
                )
            })
            .collect();
        Self {
            index,
            name: layout.name.clone(),
            blocks,
            active: Cell::new(false),
        }
    }

    /// Build one level per layout, with block ids unique across all of them.
    /// Fails if the layouts hold more blocks than there are ids.
    pub fn build_all(layouts: &[LevelLayout], scores: &ScoreTable) -> Result<Vec<Self>, ConfigError> {
        let mut next_id = 1u32;
        layouts
            .iter()
            .enumerate()
            .map(|(index, layout)| {
                let first_id = next_id;
                next_id = advance_id(first_id, layout.blocks.len()).ok_or_else(|| {
                    log::error!("Level {index}: block ids exhausted");
                    ConfigError::Invalid(format!("too many blocks, level {index} runs out of block ids"))
                })?;
                Ok(Self::from_layout(index, layout, scores, first_id))
            })
            .collect()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: u32) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks not yet destroyed
    pub fn remaining(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_active()).count()
    }

    /// Sum of every block's score
    pub fn total_score(&self) -> u64 {
        self.blocks.iter().map(|b| u64::from(b.score)).sum()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Make this the playable level and restore every block
    pub fn activate(&self) {
        self.active.set(true);
        for block in &self.blocks {
            block.reset();
        }
    }

    pub fn deactivate(&self) {
        self.active.set(false);
    }
}

/// Id following a run of `count` ids that starts at `first_id`
fn advance_id(first_id: u32, count: usize) -> Option<u32> {
    u32::try_from(count).ok().and_then(|count| first_id.checked_add(count))
}
