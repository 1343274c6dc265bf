//! Page assembly - binds a day's selection onto a layout preset.
//!
//! Assembly runs in three phases over the preset's slots:
//! 1. **Binding**: every important article claims an important slot of its
//!    exact size class; a leftover article is a hard fault, since preset
//!    matching already guaranteed the counts line up
//! 2. **Featured slot**: the featured article takes the first free short
//!    slot and always prints on its own background
//! 3. **Filling**: remaining slots draw from the filler pool, falling back
//!    to smaller size classes; a slot nothing fits prints empty
//!
//! Slots never hold more than one article and every slot of the preset
//! appears exactly once in the result.

use crate::error::{EditionError, PresetFit};
use crate::rotation::QueueBuilder;
use crate::selection::DailySelection;
use press_rules::{
    AreaLimits, Article, ArticlePool, BlockSize, GridPos, LayoutBlock, LayoutPreset, PoolId,
    PoolSet, SizeCategory, VisualCatalog, VisualKey,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// An article as it prints in one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedArticle {
    pub headline: String,
    pub body: String,

    /// Renderer template for the slot, when the catalog offers one.
    pub visual: Option<VisualKey>,

    /// Background art key, carried only when the slot paints its own.
    pub background: Option<String>,

    /// Whether the slot paints `background` instead of the page default.
    pub custom_background: bool,
}

/// What one slot of the finished page holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotContent {
    Article(PlacedArticle),
    /// The slot prints blank. Downstream renderers rely on the sentinel
    /// being explicit rather than the slot going missing.
    Empty,
}

/// One slot of the finished page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockAssignment {
    pub position: GridPos,
    pub content: SlotContent,
}

/// Matches selections against presets and fills the chosen preset's slots.
#[derive(Debug, Clone)]
pub struct PageAssembler {
    areas: AreaLimits,
}

impl PageAssembler {
    /// Create an assembler with the given slot area limits.
    pub fn new(areas: AreaLimits) -> Self {
        Self { areas }
    }

    /// Create an assembler with default area limits.
    pub fn with_defaults() -> Self {
        Self::new(AreaLimits::default())
    }

    /// Pick the preset whose important slots exactly match the selection.
    ///
    /// Candidates are scanned in shuffled order so equally fitting presets
    /// rotate across days. A preset with spare important slots never
    /// matches; the fit must be exact in every size class.
    pub fn find_preset<'a>(
        &self,
        presets: &'a [LayoutPreset],
        selection: &DailySelection,
        rng: &mut impl Rng,
    ) -> Result<&'a LayoutPreset, EditionError> {
        let required = selection.required_counts();
        let mut order: Vec<usize> = (0..presets.len()).collect();
        order.shuffle(rng);

        for index in order {
            let preset = &presets[index];
            if preset.important_counts(&self.areas) == required {
                debug!(preset = %preset.name, %required, "layout preset matched");
                return Ok(preset);
            }
        }
        error!(%required, "no layout preset offers a matching important slot mix");
        Err(EditionError::NoMatchingPreset {
            required,
            catalog: presets
                .iter()
                .map(|preset| PresetFit {
                    name: preset.name.clone(),
                    important: preset.important_counts(&self.areas),
                })
                .collect(),
        })
    }

    /// Fill the preset's slots from the selection and the filler pool.
    pub fn assign(
        &self,
        preset: &LayoutPreset,
        selection: &DailySelection,
        pools: &mut PoolSet,
        filler: PoolId,
        builder: &QueueBuilder,
        visuals: &VisualCatalog,
        rng: &mut impl Rng,
    ) -> Result<Vec<BlockAssignment>, EditionError> {
        let mut free: Vec<&LayoutBlock> = preset.blocks.iter().collect();
        let mut assignments = Vec::with_capacity(free.len());

        for article in &selection.important {
            let found = free.iter().position(|slot| {
                slot.important && slot.size_category(&self.areas) == article.size
            });
            let Some(index) = found else {
                error!(
                    headline = %article.headline,
                    size = %article.size,
                    "no important slot left for the selected article"
                );
                return Err(EditionError::SlotBindingConflict {
                    headline: article.headline.clone(),
                    category: article.size,
                });
            };
            let slot = free.remove(index);
            assignments.push(BlockAssignment {
                position: slot.position,
                content: SlotContent::Article(self.place(slot, article, true, visuals, rng)),
            });
        }

        let featured_slot = free.iter().position(|slot| {
            !slot.important && slot.size_category(&self.areas) == SizeCategory::Short
        });
        match featured_slot {
            Some(index) => {
                let slot = free.remove(index);
                let mut placed = self.place(slot, &selection.featured, false, visuals, rng);
                placed.custom_background = true;
                placed.background = selection.featured.background.clone();
                assignments.push(BlockAssignment {
                    position: slot.position,
                    content: SlotContent::Article(placed),
                });
            }
            None => warn!("no spare short slot for the featured article, dropping it"),
        }

        for slot in free {
            if slot.important {
                warn!(position = %slot.position, "important slot left over after binding, printing it empty");
                assignments.push(BlockAssignment {
                    position: slot.position,
                    content: SlotContent::Empty,
                });
                continue;
            }
            let category = slot.size_category(&self.areas);
            builder.rebuild_if_needed(pools, rng);
            let article = pools
                .get_mut(filler)
                .and_then(|pool| take_filler(pool, category));
            match article {
                Some(article) => assignments.push(BlockAssignment {
                    position: slot.position,
                    content: SlotContent::Article(self.place(slot, &article, false, visuals, rng)),
                }),
                None => {
                    debug!(position = %slot.position, %category, "no filler article fits, printing the slot empty");
                    assignments.push(BlockAssignment {
                        position: slot.position,
                        content: SlotContent::Empty,
                    });
                }
            }
        }
        Ok(assignments)
    }

    /// Render one article into one slot. Full-square slots paint the
    /// article's own background when it carries one.
    fn place(
        &self,
        slot: &LayoutBlock,
        article: &Article,
        important: bool,
        visuals: &VisualCatalog,
        rng: &mut impl Rng,
    ) -> PlacedArticle {
        let custom_background = slot.size == BlockSize::new(2, 2);
        let background = if custom_background {
            article.background.clone()
        } else {
            None
        };
        PlacedArticle {
            headline: article.headline.clone(),
            body: article.body.clone(),
            visual: visuals.resolve(slot.size, article.agency, important, rng),
            background,
            custom_background,
        }
    }
}

/// Draw a filler article for a slot, falling back to smaller size classes
/// when the slot's own class has run out.
fn take_filler(pool: &mut ArticlePool, category: SizeCategory) -> Option<Article> {
    let fallback: &[SizeCategory] = match category {
        SizeCategory::Short => &[SizeCategory::Short],
        SizeCategory::Medium => &[SizeCategory::Medium, SizeCategory::Short],
        SizeCategory::Long => &[
            SizeCategory::Long,
            SizeCategory::Medium,
            SizeCategory::Short,
        ],
    };
    fallback
        .iter()
        .find_map(|&cat| pool.take_first_of_category(cat))
}
