//! Article definitions - the content units a newspaper is assembled from.

mod article;

pub use article::*;

use serde::{Deserialize, Serialize};

/// Identifier linking the two agency takes on one event. Zero means unpaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl PairId {
    /// Sentinel for articles without an opposite-agency counterpart.
    pub const NONE: Self = Self(0);

    /// Whether this id actually links two articles.
    pub fn is_paired(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier grouping the parts of a multi-day story. Zero means standalone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct StoryId(pub u32);

impl StoryId {
    /// Sentinel for articles that belong to no story.
    pub const NONE: Self = Self(0);

    /// Whether this id names a story.
    pub fn is_story(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the news agency that wrote an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AgencyId(pub u8);

impl std::fmt::Display for AgencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_id_sentinel() {
        assert!(!PairId::NONE.is_paired());
        assert!(!PairId::default().is_paired());
        assert!(PairId(7).is_paired());
    }

    #[test]
    fn test_story_id_sentinel() {
        assert!(!StoryId::NONE.is_story());
        assert!(StoryId(3).is_story());
    }
}
