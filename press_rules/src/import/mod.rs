//! Article ingestion - JSON parsing and size classification.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::articles::{AgencyId, Article, PairId, SizeCategory, StoryId};
use crate::config::SizeThresholds;

/// Errors raised while ingesting an article document.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not a valid article array.
    #[error("invalid article document: {0}")]
    Json(#[from] serde_json::Error),
}

/// An article as it appears on the wire, before classification.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub agency: u8,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub value_positive: f32,
    #[serde(default)]
    pub value_negative: f32,
    #[serde(default)]
    pub pair_id: u32,
    #[serde(default)]
    pub story_id: u32,
    #[serde(default)]
    pub story_part: u32,
    #[serde(default)]
    pub background: Option<String>,
}

/// Parse a JSON array of articles and classify each one's size.
///
/// Over-long bodies are accepted as long articles, with a warning naming
/// the excess.
pub fn parse_articles(json: &str, sizing: &SizeThresholds) -> Result<Vec<Article>, ImportError> {
    let raw: Vec<RawArticle> = serde_json::from_str(json)?;
    let articles: Vec<Article> = raw.into_iter().map(|r| classify(r, sizing)).collect();
    debug!(count = articles.len(), "articles imported");
    Ok(articles)
}

fn classify(raw: RawArticle, sizing: &SizeThresholds) -> Article {
    let length = raw.body.chars().count();
    if length > sizing.long_max_len {
        warn!(
            headline = %raw.headline,
            length,
            excess = length - sizing.long_max_len,
            "body exceeds the long limit"
        );
    }
    let mut article = Article::new(raw.headline, raw.body)
        .with_pair(PairId(raw.pair_id))
        .with_agency(AgencyId(raw.agency))
        .with_topic(raw.topic)
        .with_values(raw.value_positive, raw.value_negative)
        .with_size(SizeCategory::from_body_len(length, sizing))
        .with_story(StoryId(raw.story_id), raw.story_part);
    if let Some(background) = raw.background {
        article = article.with_background(background);
    }
    article
}

/// Nonzero pair ids that do not appear exactly twice, in ascending order.
///
/// Callers repair or reject these before pooling; the rotation layer would
/// otherwise drop the whole group at queue-build time.
pub fn pairing_violations(articles: &[Article]) -> Vec<PairId> {
    let mut counts: BTreeMap<PairId, usize> = BTreeMap::new();
    for article in articles {
        if article.pair_id.is_paired() {
            *counts.entry(article.pair_id).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n != 2)
        .map(|(id, _)| id)
        .collect()
}
