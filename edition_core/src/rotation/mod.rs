//! Eligibility queue building - pair-aware, story-ordered reshuffling.
//!
//! A rebuild turns a pool's source set into a fresh consumption order:
//! 1. **Group**: articles become blocks; both sides of a pair share one block
//! 2. **Base sequence**: standalone blocks and story openers, shuffled
//! 3. **Continuations**: each further story part is inserted one to three
//!    blocks after the previous part, rolled against the pool's breakpoints
//! 4. **Flatten**: blocks emit their articles into the eligible queue
//!
//! Draws then come strictly from the queue's front until the next rebuild.

mod blocks;

pub use blocks::*;

use press_rules::{
    Article, ArticlePool, OffsetChances, PoolRole, PoolSet, RotationConfig, SizeCategory, StoryId,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Rebuilds eligible queues from source pools.
#[derive(Debug, Clone)]
pub struct QueueBuilder {
    config: RotationConfig,
}

impl QueueBuilder {
    /// Create a queue builder with the given breakpoint configuration.
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// Create a queue builder with default breakpoints.
    pub fn with_defaults() -> Self {
        Self::new(RotationConfig::default())
    }

    /// Rebuild every pool's queue from scratch.
    pub fn rebuild_all(&self, pools: &mut PoolSet, rng: &mut impl Rng) {
        for pool in pools.iter_mut() {
            self.rebuild_pool(pool, rng);
        }
    }

    /// Rebuild exactly the pools that need it.
    pub fn rebuild_if_needed(&self, pools: &mut PoolSet, rng: &mut impl Rng) {
        for pool in pools.iter_mut() {
            if self.needs_rebuild(pool) {
                self.rebuild_pool(pool, rng);
            }
        }
    }

    /// Whether a pool's queue must be rebuilt before further draws.
    ///
    /// Empty queues always rebuild. An unpaired filler queue also rebuilds
    /// once a size class its source can provide has run out, so slot
    /// filling never starves on category while articles remain.
    pub fn needs_rebuild(&self, pool: &ArticlePool) -> bool {
        if pool.source().is_empty() {
            return false;
        }
        if pool.queue_is_empty() {
            return true;
        }
        if pool.role() != PoolRole::Filler || pool.uses_pairs() {
            return false;
        }
        SizeCategory::ALL
            .iter()
            .any(|&cat| pool.source_has_category(cat) && !pool.queue_has_category(cat))
    }

    /// Rebuild one pool's queue from its source.
    pub fn rebuild_pool(&self, pool: &mut ArticlePool, rng: &mut impl Rng) {
        let chances = if pool.uses_pairs() {
            self.config.paired
        } else {
            self.config.unpaired
        };
        let blocks = ArticleBlock::group(pool.source());
        let sequence = self.sequence_blocks(blocks, chances, rng);
        let queue: Vec<Article> = sequence
            .into_iter()
            .flat_map(ArticleBlock::into_articles)
            .collect();
        debug!(pool = pool.name(), len = queue.len(), "rebuilt eligible queue");
        pool.replace_queue(queue);
    }

    /// Order blocks for consumption: story openers and standalone blocks
    /// shuffled uniformly, then each continuation chained in behind its
    /// previous part.
    fn sequence_blocks(
        &self,
        blocks: Vec<ArticleBlock>,
        chances: OffsetChances,
        rng: &mut impl Rng,
    ) -> Vec<ArticleBlock> {
        let mut sequence: Vec<ArticleBlock> = Vec::new();
        let mut continuations: BTreeMap<StoryId, BTreeMap<u32, ArticleBlock>> = BTreeMap::new();

        for block in blocks {
            if block.story_id().is_story() && block.story_part() != 1 {
                let story = continuations.entry(block.story_id()).or_default();
                if story.insert(block.story_part(), block).is_some() {
                    warn!("duplicate story part, keeping the later block");
                }
            } else {
                sequence.push(block);
            }
        }
        sequence.shuffle(rng);

        // BTreeMap iteration keeps story handling independent of hash order.
        for (story_id, mut parts) in continuations {
            let opener = sequence
                .iter()
                .position(|b| b.story_id() == story_id && b.story_part() == 1);
            let Some(mut index) = opener else {
                warn!(
                    story = %story_id,
                    excluded = parts.len(),
                    "story has continuations but no opening part, excluding them"
                );
                continue;
            };
            let mut part = 2;
            while let Some(block) = parts.remove(&part) {
                let offset = self.draw_offset(chances, rng);
                let at = (index + offset).min(sequence.len());
                sequence.insert(at, block);
                index = at;
                part += 1;
            }
            if !parts.is_empty() {
                warn!(
                    story = %story_id,
                    excluded = parts.len(),
                    "story parts unreachable from the opener, excluding them"
                );
            }
        }
        sequence
    }

    /// Roll the insertion distance for one continuation.
    fn draw_offset(&self, chances: OffsetChances, rng: &mut impl Rng) -> usize {
        let roll: f32 = rng.gen();
        if roll < chances.offset_one {
            1
        } else if roll < chances.offset_two {
            2
        } else {
            3
        }
    }
}
