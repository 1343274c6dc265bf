//! Article pools - source sets and the consumable queues drawn from them.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::articles::{Article, SizeCategory};

/// What a pool feeds during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolRole {
    /// Curated picks, selected by weighted genre.
    Genre,
    /// The rotating front-page article.
    Featured,
    /// Category-matched filler for leftover slots.
    Filler,
}

/// A source set of articles plus the eligible queue draws are taken from.
///
/// The source never changes during play. The queue is a constrained
/// permutation of it, drained strictly from the front and rebuilt once
/// spent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlePool {
    name: String,
    role: PoolRole,
    uses_pairs: bool,
    source: Vec<Article>,
    queue: VecDeque<Article>,
}

impl ArticlePool {
    /// Create an empty pool.
    pub fn new(name: impl Into<String>, role: PoolRole) -> Self {
        Self {
            name: name.into(),
            role,
            uses_pairs: false,
            source: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Mark whether the pool holds paired articles.
    pub fn with_pairs(mut self, uses_pairs: bool) -> Self {
        self.uses_pairs = uses_pairs;
        self
    }

    /// Seed the pool's source articles.
    pub fn with_articles(mut self, articles: impl IntoIterator<Item = Article>) -> Self {
        self.source.extend(articles);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> PoolRole {
        self.role
    }

    pub fn uses_pairs(&self) -> bool {
        self.uses_pairs
    }

    /// The immutable source set.
    pub fn source(&self) -> &[Article] {
        &self.source
    }

    /// Remaining queued articles, front first.
    pub fn queued(&self) -> impl Iterator<Item = &Article> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The next article up, without drawing it.
    pub fn front(&self) -> Option<&Article> {
        self.queue.front()
    }

    /// The article behind the front one.
    pub fn second(&self) -> Option<&Article> {
        self.queue.get(1)
    }

    /// Draw the next article.
    pub fn pop_front(&mut self) -> Option<Article> {
        self.queue.pop_front()
    }

    /// Draw the first queued article of the given size class, wherever it
    /// sits in the queue.
    pub fn take_first_of_category(&mut self, category: SizeCategory) -> Option<Article> {
        let index = self.queue.iter().position(|a| a.size == category)?;
        self.queue.remove(index)
    }

    /// Whether any queued article has the given size class.
    pub fn queue_has_category(&self, category: SizeCategory) -> bool {
        self.queue.iter().any(|a| a.size == category)
    }

    /// Whether any source article has the given size class.
    pub fn source_has_category(&self, category: SizeCategory) -> bool {
        self.source.iter().any(|a| a.size == category)
    }

    /// Install a freshly built queue.
    pub fn replace_queue(&mut self, articles: Vec<Article>) {
        self.queue = articles.into();
    }
}

/// Handle to a pool inside a `PoolSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(usize);

/// Arena of every pool a newsroom draws from.
///
/// Pools are addressed by the `PoolId` handed out at insertion, so callers
/// can hold on to a pool across mutations of the set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSet {
    pools: Vec<ArticlePool>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pool, returning its handle.
    pub fn insert(&mut self, pool: ArticlePool) -> PoolId {
        self.pools.push(pool);
        PoolId(self.pools.len() - 1)
    }

    pub fn get(&self, id: PoolId) -> Option<&ArticlePool> {
        self.pools.get(id.0)
    }

    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut ArticlePool> {
        self.pools.get_mut(id.0)
    }

    /// First pool carrying the given role.
    pub fn first_by_role(&self, role: PoolRole) -> Option<PoolId> {
        self.pools.iter().position(|p| p.role() == role).map(PoolId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArticlePool> {
        self.pools.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ArticlePool> {
        self.pools.iter_mut()
    }

    /// Iterate pools together with their handles.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (PoolId, &ArticlePool)> {
        self.pools.iter().enumerate().map(|(i, p)| (PoolId(i), p))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(headline: &str, size: SizeCategory) -> Article {
        Article::new(headline, "body").with_size(size)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut pools = PoolSet::new();
        let politics = pools.insert(ArticlePool::new("politics", PoolRole::Genre));
        let fruit = pools.insert(ArticlePool::new("fruit", PoolRole::Featured));

        assert_eq!(pools.len(), 2);
        assert_eq!(pools.get(politics).unwrap().name(), "politics");
        assert_eq!(pools.first_by_role(PoolRole::Featured), Some(fruit));
        assert_eq!(pools.first_by_role(PoolRole::Filler), None);
    }

    #[test]
    fn test_take_first_of_category_searches_whole_queue() {
        let mut pool = ArticlePool::new("filler", PoolRole::Filler).with_articles([
            sized("a", SizeCategory::Long),
            sized("b", SizeCategory::Short),
            sized("c", SizeCategory::Short),
        ]);
        pool.replace_queue(pool.source().to_vec());

        let taken = pool.take_first_of_category(SizeCategory::Short).unwrap();
        assert_eq!(taken.headline, "b");
        assert_eq!(pool.queue_len(), 2);
        assert_eq!(pool.front().unwrap().headline, "a");

        assert!(pool.take_first_of_category(SizeCategory::Medium).is_none());
        assert_eq!(pool.queue_len(), 2);
    }

    #[test]
    fn test_category_presence_checks() {
        let mut pool = ArticlePool::new("filler", PoolRole::Filler)
            .with_articles([sized("a", SizeCategory::Short), sized("b", SizeCategory::Long)]);
        pool.replace_queue(vec![sized("a", SizeCategory::Short)]);

        assert!(pool.source_has_category(SizeCategory::Long));
        assert!(!pool.queue_has_category(SizeCategory::Long));
        assert!(pool.queue_has_category(SizeCategory::Short));
    }

    #[test]
    fn test_front_and_second() {
        let mut pool = ArticlePool::new("genre", PoolRole::Genre);
        pool.replace_queue(vec![sized("x", SizeCategory::Short), sized("y", SizeCategory::Short)]);

        assert_eq!(pool.front().unwrap().headline, "x");
        assert_eq!(pool.second().unwrap().headline, "y");

        let popped = pool.pop_front().unwrap();
        assert_eq!(popped.headline, "x");
        assert_eq!(pool.front().unwrap().headline, "y");
        assert!(pool.second().is_none());
    }
}
