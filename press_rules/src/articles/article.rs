//! The article record and its size classification.

use serde::{Deserialize, Serialize};

use super::{AgencyId, PairId, StoryId};
use crate::config::SizeThresholds;

/// Size classes that articles and layout slots are matched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Short,
    Medium,
    Long,
}

impl SizeCategory {
    /// All categories, in ascending size order.
    pub const ALL: [Self; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Classify a body of `len` characters against the configured thresholds.
    ///
    /// Bodies beyond the long limit still classify as long; the importer
    /// warns about them separately.
    pub fn from_body_len(len: usize, sizing: &SizeThresholds) -> Self {
        if len <= sizing.short_max_len {
            Self::Short
        } else if len <= sizing.medium_max_len {
            Self::Medium
        } else {
            Self::Long
        }
    }
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        };
        write!(f, "{}", name)
    }
}

/// A single news article, as it leaves the importer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Links the two agency versions of one event. `PairId::NONE` when unpaired.
    pub pair_id: PairId,

    pub headline: String,

    /// Full body text.
    pub body: String,

    /// Which agency wrote this version.
    pub agency: AgencyId,

    /// Subgenre tag within the article's pool.
    pub topic: String,

    /// Impact score of the favorable reading.
    pub value_positive: f32,

    /// Impact score of the unfavorable reading.
    pub value_negative: f32,

    /// Size class, fixed at import time.
    pub size: SizeCategory,

    /// Story this article continues. `StoryId::NONE` when standalone.
    pub story_id: StoryId,

    /// 1-based position within its story, zero for standalone articles.
    pub story_part: u32,

    /// Key of the article's own background art, when it has any.
    pub background: Option<String>,
}

impl Article {
    /// Create a short standalone article with neutral scores.
    pub fn new(headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            pair_id: PairId::NONE,
            headline: headline.into(),
            body: body.into(),
            agency: AgencyId::default(),
            topic: String::new(),
            value_positive: 0.0,
            value_negative: 0.0,
            size: SizeCategory::Short,
            story_id: StoryId::NONE,
            story_part: 0,
            background: None,
        }
    }

    /// Set the pair id.
    pub fn with_pair(mut self, pair: PairId) -> Self {
        self.pair_id = pair;
        self
    }

    /// Set the agency.
    pub fn with_agency(mut self, agency: AgencyId) -> Self {
        self.agency = agency;
        self
    }

    /// Set the topic tag.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Set both impact scores.
    pub fn with_values(mut self, positive: f32, negative: f32) -> Self {
        self.value_positive = positive;
        self.value_negative = negative;
        self
    }

    /// Set the size class.
    pub fn with_size(mut self, size: SizeCategory) -> Self {
        self.size = size;
        self
    }

    /// Place the article within a story.
    pub fn with_story(mut self, story: StoryId, part: u32) -> Self {
        self.story_id = story;
        self.story_part = part;
        self
    }

    /// Set the background art key.
    pub fn with_background(mut self, key: impl Into<String>) -> Self {
        self.background = Some(key.into());
        self
    }

    /// The larger of the two impact scores, used for continuation weighting.
    pub fn impact(&self) -> f32 {
        self.value_positive.max(self.value_negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_builder() {
        let article = Article::new("Reactor stable again", "Officials confirmed...")
            .with_pair(PairId(4))
            .with_agency(AgencyId(2))
            .with_topic("energy")
            .with_values(0.6, 0.8)
            .with_size(SizeCategory::Medium)
            .with_story(StoryId(9), 2)
            .with_background("reactor_tower");

        assert_eq!(article.pair_id, PairId(4));
        assert_eq!(article.agency, AgencyId(2));
        assert_eq!(article.size, SizeCategory::Medium);
        assert_eq!(article.story_id, StoryId(9));
        assert_eq!(article.story_part, 2);
        assert_eq!(article.background.as_deref(), Some("reactor_tower"));
        assert!((article.impact() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_new_article_is_standalone() {
        let article = Article::new("Plain", "text");
        assert!(!article.pair_id.is_paired());
        assert!(!article.story_id.is_story());
        assert!(article.background.is_none());
    }

    #[test]
    fn test_size_classification_boundaries() {
        let sizing = SizeThresholds {
            short_max_len: 10,
            medium_max_len: 20,
            long_max_len: 30,
        };

        assert_eq!(SizeCategory::from_body_len(10, &sizing), SizeCategory::Short);
        assert_eq!(SizeCategory::from_body_len(11, &sizing), SizeCategory::Medium);
        assert_eq!(SizeCategory::from_body_len(20, &sizing), SizeCategory::Medium);
        assert_eq!(SizeCategory::from_body_len(21, &sizing), SizeCategory::Long);
        // Over the long limit still classifies as long.
        assert_eq!(SizeCategory::from_body_len(99, &sizing), SizeCategory::Long);
    }

    #[test]
    fn test_size_category_serializes_lowercase() {
        let json = serde_json::to_string(&SizeCategory::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
