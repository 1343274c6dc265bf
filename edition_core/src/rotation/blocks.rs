//! Pair-aware grouping of articles into rotation blocks.

use press_rules::{Article, PairId, StoryId};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// One rotation unit: a lone article, or both sides of a pair.
///
/// Blocks only live while a queue is rebuilt; flattening emits their
/// articles back out in block order, which is what keeps pairs adjacent
/// in every queue.
#[derive(Debug, Clone)]
pub struct ArticleBlock {
    articles: Vec<Article>,
}

impl ArticleBlock {
    fn single(article: Article) -> Self {
        Self {
            articles: vec![article],
        }
    }

    fn pair(first: Article, second: Article) -> Self {
        Self {
            articles: vec![first, second],
        }
    }

    /// Group a source pool into blocks, keeping each nonzero pair together.
    ///
    /// Pair groups that do not hold exactly two members are invalid data
    /// and are dropped whole. First-seen order is preserved so a seeded
    /// rebuild reproduces exactly.
    pub fn group(articles: &[Article]) -> Vec<Self> {
        let mut groups: HashMap<PairId, Vec<Article>> = HashMap::new();
        for article in articles {
            if article.pair_id.is_paired() {
                groups
                    .entry(article.pair_id)
                    .or_default()
                    .push(article.clone());
            }
        }

        let mut seen: HashSet<PairId> = HashSet::new();
        let mut blocks = Vec::new();
        for article in articles {
            if !article.pair_id.is_paired() {
                blocks.push(Self::single(article.clone()));
                continue;
            }
            if !seen.insert(article.pair_id) {
                continue;
            }
            let Some(group) = groups.remove(&article.pair_id) else {
                continue;
            };
            if group.len() == 2 {
                let mut members = group.into_iter();
                if let (Some(first), Some(second)) = (members.next(), members.next()) {
                    blocks.push(Self::pair(first, second));
                }
            } else {
                warn!(
                    pair = %article.pair_id,
                    members = group.len(),
                    "pair group does not hold exactly two articles, dropping it"
                );
            }
        }
        blocks
    }

    /// Story id of the block, taken from its first member.
    pub fn story_id(&self) -> StoryId {
        self.articles[0].story_id
    }

    /// Story part of the block, taken from its first member.
    pub fn story_part(&self) -> u32 {
        self.articles[0].story_part
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }
}
