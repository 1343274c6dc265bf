//! Daily selection - picks the articles an edition will print.
//!
//! One selection round walks the pools in a fixed sequence:
//! 1. **Rebuild pass**: exhausted queues are rebuilt before any draw
//! 2. **Genre weighting**: every genre pool rolls a weight, dampened for
//!    genres picked the previous day; the top pools win
//! 3. **Primary picks**: each winning pool surrenders its front article,
//!    or one coin-flipped side of its front pair
//! 4. **Hype slot**: one picked pair article drags its opposite-agency
//!    partner into the edition, biased toward high impact values
//! 5. **Fifth slot**: a configured chance of repeating the hype draw
//! 6. **Featured draw**: the featured pool surrenders its front article
//! 7. **Closing rebuild pass**: queues drained by this round refill so the
//!    next round never starts dry
//!
//! The round only fails when the featured pool cannot produce an article
//! or is missing outright.

use crate::error::EditionError;
use crate::rotation::QueueBuilder;
use press_rules::{
    Article, CategoryCounts, PairId, PoolId, PoolRole, PoolSet, SelectionConfig,
};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Genres picked on the previous day, kept to dampen repeats.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SelectionMemory {
    last_genres: Vec<String>,
}

impl SelectionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a genre won selection on the previous round.
    pub fn was_picked(&self, name: &str) -> bool {
        self.last_genres.iter().any(|g| g == name)
    }

    /// Replace the remembered genres with this round's winners.
    pub fn remember(&mut self, names: Vec<String>) {
        self.last_genres = names;
    }

    pub fn reset(&mut self) {
        self.last_genres.clear();
    }
}

/// Everything one selection round produced.
#[derive(Debug, Clone)]
pub struct DailySelection {
    /// Important articles, in pick order: genre primaries, then hype draws.
    pub important: Vec<Article>,
    /// The featured article, placed outside the important slots.
    pub featured: Article,
    /// Both sides of every pair drawn this round, keyed by pair.
    pub pairs: HashMap<PairId, (Article, Article)>,
}

impl DailySelection {
    /// Important slot demand by size class, used to pick a layout preset.
    pub fn required_counts(&self) -> CategoryCounts {
        CategoryCounts::tally(self.important.iter().map(|a| a.size))
    }
}

/// Runs daily selection rounds over a pool set.
#[derive(Debug, Clone)]
pub struct Selector {
    config: SelectionConfig,
}

impl Selector {
    /// Create a selector with the given tuning.
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Create a selector with default tuning.
    pub fn with_defaults() -> Self {
        Self::new(SelectionConfig::default())
    }

    /// Run one selection round.
    pub fn select_daily(
        &self,
        pools: &mut PoolSet,
        featured: PoolId,
        builder: &QueueBuilder,
        memory: &mut SelectionMemory,
        rng: &mut impl Rng,
    ) -> Result<DailySelection, EditionError> {
        builder.rebuild_if_needed(pools, rng);

        let mut important = Vec::new();
        let mut pairs = HashMap::new();

        for id in self.pick_genres(pools, memory, rng) {
            self.pick_primary(pools, id, &mut important, &mut pairs, rng);
        }
        if self.config.hype_slot {
            self.pick_hype(&mut important, &pairs, rng);
        }
        if self.config.fifth_slot && rng.gen::<f32>() < self.config.fifth_slot_chance / 100.0 {
            debug!("fifth slot triggered, repeating the hype draw");
            self.pick_hype(&mut important, &pairs, rng);
        }

        let featured = match pools.get_mut(featured) {
            Some(pool) => match pool.pop_front() {
                Some(article) => article,
                None => {
                    error!(pool = pool.name(), "featured pool has nothing left to print");
                    return Err(EditionError::FeaturedPoolExhausted {
                        pool: pool.name().to_owned(),
                    });
                }
            },
            None => return Err(EditionError::MissingPool { role: PoolRole::Featured }),
        };

        builder.rebuild_if_needed(pools, rng);

        debug!(
            important = important.len(),
            pairs = pairs.len(),
            featured = %featured.headline,
            "selection round complete"
        );
        Ok(DailySelection { important, featured, pairs })
    }

    /// Roll weights over the genre pools and keep the top winners.
    fn pick_genres(
        &self,
        pools: &PoolSet,
        memory: &mut SelectionMemory,
        rng: &mut impl Rng,
    ) -> Vec<PoolId> {
        let mut weighted: Vec<(PoolId, String, f32)> = Vec::new();
        for (id, pool) in pools.iter_with_ids() {
            if pool.role() != PoolRole::Genre {
                continue;
            }
            if pool.queue_len() < 2 {
                warn!(pool = pool.name(), "genre pool too thin to draw from, skipped");
                continue;
            }
            let mut weight: f32 = rng.gen();
            if memory.was_picked(pool.name()) {
                weight *= self.config.repeat_penalty;
            }
            weighted.push((id, pool.name().to_owned(), weight));
        }
        weighted.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        weighted.truncate(self.config.genre_count);

        memory.remember(weighted.iter().map(|(_, name, _)| name.clone()).collect());
        weighted.into_iter().map(|(id, _, _)| id).collect()
    }

    /// Draw one genre pool's primary: the front article, or one coin-flipped
    /// side of the front pair. Pair draws record both sides for the hype
    /// slot to resolve later.
    fn pick_primary(
        &self,
        pools: &mut PoolSet,
        id: PoolId,
        important: &mut Vec<Article>,
        pairs: &mut HashMap<PairId, (Article, Article)>,
        rng: &mut impl Rng,
    ) {
        let Some(pool) = pools.get_mut(id) else {
            warn!("genre pool vanished between weighting and drawing");
            return;
        };
        let front_is_pair = match (pool.front(), pool.second()) {
            (Some(first), Some(second)) => {
                first.pair_id.is_paired() && first.pair_id == second.pair_id
            }
            _ => false,
        };
        if front_is_pair {
            let (Some(first), Some(second)) = (pool.pop_front(), pool.pop_front()) else {
                warn!(pool = pool.name(), "front pair vanished mid-draw");
                return;
            };
            pairs.insert(first.pair_id, (first.clone(), second.clone()));
            let shown = if rng.gen::<f32>() < 0.5 { first } else { second };
            important.push(shown);
        } else {
            match pool.pop_front() {
                Some(article) => important.push(article),
                None => warn!(pool = pool.name(), "genre pool ran dry mid-draw"),
            }
        }
    }

    /// Pull one picked pair's hidden partner into the important set. The
    /// pick is biased toward pairs whose shown side carries high impact,
    /// with each pair's share clamped into the configured band. A pair
    /// whose sides share one agency has no partner to pull and never
    /// enters the draw.
    fn pick_hype(
        &self,
        important: &mut Vec<Article>,
        pairs: &HashMap<PairId, (Article, Article)>,
        rng: &mut impl Rng,
    ) {
        let candidates: Vec<(usize, f32)> = important
            .iter()
            .enumerate()
            .filter_map(|(index, article)| {
                let (a, b) = pairs.get(&article.pair_id)?;
                let shown = important
                    .iter()
                    .filter(|other| other.pair_id == article.pair_id)
                    .count();
                if shown >= 2 {
                    return None;
                }
                if a.agency == b.agency {
                    warn!(
                        pair = %article.pair_id,
                        "pair members share one agency, excluded from the hype draw"
                    );
                    return None;
                }
                Some((index, article.impact()))
            })
            .collect();

        let total: f32 = candidates.iter().map(|(_, weight)| weight).sum();
        if candidates.is_empty() || total <= 0.0 {
            debug!("no viable hype candidate this round");
            return;
        }
        let min = self.config.min_hype_chance / 100.0;
        let max = self.config.max_hype_chance / 100.0;

        let mut best: Option<(usize, f32)> = None;
        for (index, weight) in candidates {
            let clamped = (weight / total).clamp(min, max);
            let score = rng.gen::<f32>() * (1.0 / clamped);
            if best.map_or(true, |(_, lowest)| score < lowest) {
                best = Some((index, score));
            }
        }
        let Some((index, _)) = best else { return };

        let partner = {
            let chosen = &important[index];
            let Some((a, b)) = pairs.get(&chosen.pair_id) else {
                return;
            };
            if a.agency != chosen.agency {
                a.clone()
            } else {
                b.clone()
            }
        };
        important.push(partner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_rules::{AgencyId, ArticlePool};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn single(headline: &str) -> Article {
        Article::new(headline, "body")
    }

    fn pair_side(headline: &str, pair: u32, agency: u8, impact: f32) -> Article {
        Article::new(headline, "body")
            .with_pair(PairId(pair))
            .with_agency(AgencyId(agency))
            .with_values(impact, impact / 2.0)
    }

    fn featured_pool() -> ArticlePool {
        ArticlePool::new("fruit", PoolRole::Featured)
            .with_articles([single("fruit one"), single("fruit two")])
    }

    fn config(genre_count: usize, hype: bool, fifth_chance: f32) -> SelectionConfig {
        SelectionConfig {
            genre_count,
            hype_slot: hype,
            fifth_slot: fifth_chance > 0.0,
            fifth_slot_chance: fifth_chance,
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn test_pair_draw_records_both_sides() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("politics", PoolRole::Genre)
                .with_pairs(true)
                .with_articles([
                    pair_side("spin a", 1, 1, 50.0),
                    pair_side("spin b", 1, 2, 30.0),
                ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(1, false, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_eq!(selection.important.len(), 1);
        assert_eq!(selection.pairs.len(), 1);
        let (a, b) = &selection.pairs[&PairId(1)];
        assert_ne!(a.headline, b.headline);
        assert!(selection.important[0].pair_id == PairId(1));

        // Both pair members left the queue; the closing rebuild pass then
        // refilled the emptied genre from its source.
        let genre = pools.iter().find(|p| p.name() == "politics").unwrap();
        assert_eq!(genre.queue_len(), 2);
    }

    #[test]
    fn test_unpaired_front_draw() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("sports", PoolRole::Genre).with_articles([
                single("match report"),
                single("transfer gossip"),
                single("injury news"),
            ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(1, false, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_eq!(selection.important.len(), 1);
        assert!(selection.pairs.is_empty());
    }

    #[test]
    fn test_repeat_penalty_steers_to_fresh_genre() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("politics", PoolRole::Genre)
                .with_articles([single("politics one"), single("politics two")]),
        );
        pools.insert(
            ArticlePool::new("economy", PoolRole::Genre)
                .with_articles([single("economy one"), single("economy two")]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(SelectionConfig {
            genre_count: 1,
            repeat_penalty: 0.0,
            hype_slot: false,
            fifth_slot: false,
            ..SelectionConfig::default()
        });
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        memory.remember(vec!["politics".to_owned()]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert!(selection.important[0].headline.starts_with("economy"));
        assert!(memory.was_picked("economy"));
        assert!(!memory.was_picked("politics"));
    }

    #[test]
    fn test_hype_adds_opposite_agency_partner() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("politics", PoolRole::Genre)
                .with_pairs(true)
                .with_articles([
                    pair_side("spin a", 1, 1, 60.0),
                    pair_side("spin b", 1, 2, 40.0),
                ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(1, true, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_eq!(selection.important.len(), 2);
        assert_eq!(selection.important[0].pair_id, selection.important[1].pair_id);
        assert_ne!(selection.important[0].agency, selection.important[1].agency);
    }

    #[test]
    fn test_hype_skipped_when_impact_is_zero() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("politics", PoolRole::Genre)
                .with_pairs(true)
                .with_articles([
                    pair_side("spin a", 1, 1, 0.0),
                    pair_side("spin b", 1, 2, 0.0),
                ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(1, true, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_eq!(selection.important.len(), 1);
    }

    #[test]
    fn test_hype_skipped_when_pair_shares_agency() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("politics", PoolRole::Genre)
                .with_pairs(true)
                .with_articles([
                    pair_side("spin a", 1, 7, 60.0),
                    pair_side("spin b", 1, 7, 40.0),
                ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(1, true, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_eq!(selection.important.len(), 1);
    }

    #[test]
    fn test_hype_draw_passes_over_same_agency_pair() {
        for seed in 0..20 {
            let mut pools = PoolSet::new();
            pools.insert(
                ArticlePool::new("politics", PoolRole::Genre)
                    .with_pairs(true)
                    .with_articles([
                        pair_side("echo a", 1, 7, 95.0),
                        pair_side("echo b", 1, 7, 90.0),
                    ]),
            );
            pools.insert(
                ArticlePool::new("economy", PoolRole::Genre)
                    .with_pairs(true)
                    .with_articles([
                        pair_side("market a", 2, 1, 5.0),
                        pair_side("market b", 2, 2, 4.0),
                    ]),
            );
            let featured = pools.insert(featured_pool());
            let selector = Selector::new(config(2, true, 0.0));
            let builder = QueueBuilder::with_defaults();
            let mut memory = SelectionMemory::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let selection = selector
                .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
                .unwrap();

            // However lopsided the impact values, the one-agency pair cannot
            // offer an opposite partner. The other pair's hidden side must
            // land every time.
            assert_eq!(selection.important.len(), 3, "seed {}", seed);
            let market_sides = selection
                .important
                .iter()
                .filter(|a| a.pair_id == PairId(2))
                .count();
            assert_eq!(market_sides, 2, "seed {}", seed);
            let echo_sides = selection
                .important
                .iter()
                .filter(|a| a.pair_id == PairId(1))
                .count();
            assert_eq!(echo_sides, 1, "seed {}", seed);
        }
    }

    #[test]
    fn test_fifth_slot_repeats_the_hype_draw() {
        let build = |chance: f32, seed: u64| {
            let mut pools = PoolSet::new();
            pools.insert(
                ArticlePool::new("politics", PoolRole::Genre)
                    .with_pairs(true)
                    .with_articles([
                        pair_side("spin a", 1, 1, 60.0),
                        pair_side("spin b", 1, 2, 40.0),
                    ]),
            );
            pools.insert(
                ArticlePool::new("economy", PoolRole::Genre)
                    .with_pairs(true)
                    .with_articles([
                        pair_side("market a", 2, 1, 55.0),
                        pair_side("market b", 2, 2, 45.0),
                    ]),
            );
            let featured = pools.insert(featured_pool());
            let selector = Selector::new(config(2, true, chance));
            let builder = QueueBuilder::with_defaults();
            let mut memory = SelectionMemory::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            selector
                .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
                .unwrap()
        };

        assert_eq!(build(100.0, 13).important.len(), 4);
        assert_eq!(build(0.0, 13).important.len(), 3);
    }

    #[test]
    fn test_featured_draw_is_front_of_queue() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("sports", PoolRole::Genre).with_articles([
                single("one"),
                single("two"),
                single("three"),
                single("four"),
            ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(1, false, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let first = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();
        let second = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_ne!(first.featured.headline, second.featured.headline);
        let mut served = vec![first.featured.headline, second.featured.headline];
        served.sort();
        assert_eq!(served, vec!["fruit one", "fruit two"]);
    }

    #[test]
    fn test_featured_starvation_is_fatal() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("sports", PoolRole::Genre)
                .with_articles([single("one"), single("two")]),
        );
        let featured = pools.insert(ArticlePool::new("fruit", PoolRole::Featured));
        let selector = Selector::new(config(1, false, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let result = selector.select_daily(&mut pools, featured, &builder, &mut memory, &mut rng);

        assert!(matches!(
            result,
            Err(EditionError::FeaturedPoolExhausted { .. })
        ));
    }

    #[test]
    fn test_thin_genre_pool_is_skipped() {
        let mut pools = PoolSet::new();
        pools.insert(
            ArticlePool::new("thin", PoolRole::Genre).with_articles([single("lonely")]),
        );
        pools.insert(
            ArticlePool::new("fat", PoolRole::Genre).with_articles([
                single("fat one"),
                single("fat two"),
                single("fat three"),
            ]),
        );
        let featured = pools.insert(featured_pool());
        let selector = Selector::new(config(2, false, 0.0));
        let builder = QueueBuilder::with_defaults();
        let mut memory = SelectionMemory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let selection = selector
            .select_daily(&mut pools, featured, &builder, &mut memory, &mut rng)
            .unwrap();

        assert_eq!(selection.important.len(), 1);
        assert!(selection.important[0].headline.starts_with("fat"));
        assert!(memory.was_picked("fat"));
        assert!(!memory.was_picked("thin"));
    }
}
