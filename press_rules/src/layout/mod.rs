//! Layout definitions - grid slots, presets, and per-category counting.

mod visuals;

pub use visuals::*;

use serde::{Deserialize, Serialize};

use crate::articles::SizeCategory;
use crate::config::AreaLimits;

/// Cell position of a slot on the page grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extent of a slot in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
}

impl BlockSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of grid cells the slot covers.
    pub fn area(self) -> u32 {
        self.width * self.height
    }
}

impl std::fmt::Display for BlockSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One slot of a layout preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub position: GridPos,
    pub size: BlockSize,

    /// Whether the slot is reserved for curated picks.
    pub important: bool,
}

impl LayoutBlock {
    /// Create a filler slot at the given position.
    pub fn new(position: GridPos, size: BlockSize) -> Self {
        Self {
            position,
            size,
            important: false,
        }
    }

    /// Set whether the slot is reserved for curated picks.
    pub fn with_importance(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Size class of the slot, by covered area.
    pub fn size_category(&self, areas: &AreaLimits) -> SizeCategory {
        let area = self.size.area();
        if area <= areas.short_max_area {
            SizeCategory::Short
        } else if area <= areas.medium_max_area {
            SizeCategory::Medium
        } else {
            SizeCategory::Long
        }
    }
}

/// A named, fixed arrangement of slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPreset {
    pub name: String,
    pub blocks: Vec<LayoutBlock>,
}

impl LayoutPreset {
    pub fn new(name: impl Into<String>, blocks: Vec<LayoutBlock>) -> Self {
        Self {
            name: name.into(),
            blocks,
        }
    }

    /// Counts of important slots per size class.
    ///
    /// A preset fits a day's selection only when these counts equal the
    /// selection's own counts exactly.
    pub fn important_counts(&self, areas: &AreaLimits) -> CategoryCounts {
        CategoryCounts::tally(
            self.blocks
                .iter()
                .filter(|block| block.important)
                .map(|block| block.size_category(areas)),
        )
    }
}

/// Per-size-class tally used to match selections against presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl CategoryCounts {
    /// Tally an iterator of size classes.
    pub fn tally(categories: impl IntoIterator<Item = SizeCategory>) -> Self {
        let mut counts = Self::default();
        for category in categories {
            counts.add(category);
        }
        counts
    }

    /// Bump one class by one.
    pub fn add(&mut self, category: SizeCategory) {
        match category {
            SizeCategory::Short => self.short += 1,
            SizeCategory::Medium => self.medium += 1,
            SizeCategory::Long => self.long += 1,
        }
    }

    /// Count for one class.
    pub fn get(&self, category: SizeCategory) -> usize {
        match category {
            SizeCategory::Short => self.short,
            SizeCategory::Medium => self.medium,
            SizeCategory::Long => self.long,
        }
    }

    /// Total across all classes.
    pub fn total(&self) -> usize {
        self.short + self.medium + self.long
    }
}

impl std::fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "short {}, medium {}, long {}",
            self.short, self.medium, self.long
        )
    }
}
