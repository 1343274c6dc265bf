//! The newsroom - owns the pools and turns them into daily editions.
//!
//! `Newsroom` is the single entry point callers drive. It owns the pool
//! set, the day-to-day selection memory, and one seeded random stream, so
//! two newsrooms opened over the same data and seed print the same pages.

use crate::assembly::{BlockAssignment, PageAssembler};
use crate::error::EditionError;
use crate::rotation::QueueBuilder;
use crate::selection::{SelectionMemory, Selector};
use press_rules::{
    ArticlePool, EditionConfig, LayoutPreset, PoolId, PoolRole, PoolSet, VisualCatalog,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Unique identifier for a printed edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditionId(pub Uuid);

impl EditionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EditionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One finished page: the preset it used and every slot's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edition {
    pub id: EditionId,
    pub preset: String,
    pub assignments: Vec<BlockAssignment>,
}

/// Owns the pools and produces one edition per call.
#[derive(Debug)]
pub struct Newsroom {
    pools: PoolSet,
    featured: PoolId,
    filler: PoolId,
    builder: QueueBuilder,
    selector: Selector,
    assembler: PageAssembler,
    memory: SelectionMemory,
    rng: ChaCha8Rng,
}

impl Newsroom {
    /// Open a newsroom over a pool set.
    ///
    /// Fails when no featured or filler pool is registered. Every queue is
    /// built up front so the first edition draws from rotated pools.
    pub fn new(pools: PoolSet, config: EditionConfig, seed: u64) -> Result<Self, EditionError> {
        let featured = pools
            .first_by_role(PoolRole::Featured)
            .ok_or(EditionError::MissingPool {
                role: PoolRole::Featured,
            })?;
        let filler = pools
            .first_by_role(PoolRole::Filler)
            .ok_or(EditionError::MissingPool {
                role: PoolRole::Filler,
            })?;

        let mut newsroom = Self {
            pools,
            featured,
            filler,
            builder: QueueBuilder::new(config.rotation),
            selector: Selector::new(config.selection),
            assembler: PageAssembler::new(config.areas),
            memory: SelectionMemory::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        newsroom
            .builder
            .rebuild_all(&mut newsroom.pools, &mut newsroom.rng);
        Ok(newsroom)
    }

    /// Assemble one edition: select the day's articles, match a preset,
    /// and fill its slots.
    pub fn build_edition(
        &mut self,
        presets: &[LayoutPreset],
        visuals: &VisualCatalog,
    ) -> Result<Edition, EditionError> {
        let selection = self.selector.select_daily(
            &mut self.pools,
            self.featured,
            &self.builder,
            &mut self.memory,
            &mut self.rng,
        )?;
        let preset = self.assembler.find_preset(presets, &selection, &mut self.rng)?;
        let assignments = self.assembler.assign(
            preset,
            &selection,
            &mut self.pools,
            self.filler,
            &self.builder,
            visuals,
            &mut self.rng,
        )?;

        let edition = Edition {
            id: EditionId::new(),
            preset: preset.name.clone(),
            assignments,
        };
        info!(
            id = %edition.id,
            preset = %edition.preset,
            slots = edition.assignments.len(),
            "edition assembled"
        );
        Ok(edition)
    }

    /// Rebuild every pool's queue from scratch.
    pub fn rebuild_all(&mut self) {
        self.builder.rebuild_all(&mut self.pools, &mut self.rng);
    }

    /// Forget the previous day's genre picks.
    pub fn reset_memory(&mut self) {
        self.memory.reset();
    }

    pub fn pools(&self) -> &PoolSet {
        &self.pools
    }

    pub fn memory(&self) -> &SelectionMemory {
        &self.memory
    }

    pub fn featured_pool(&self) -> Option<&ArticlePool> {
        self.pools.get(self.featured)
    }

    pub fn filler_pool(&self) -> Option<&ArticlePool> {
        self.pools.get(self.filler)
    }
}
