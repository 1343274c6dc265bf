//! Slot visual lookup - which renderer template a placed article uses.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::{BlockSize, LayoutPreset};
use crate::articles::AgencyId;

/// Opaque key the renderer resolves to a concrete slot template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualKey(pub String);

impl VisualKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl std::fmt::Display for VisualKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One catalog row: the visual variants available for a slot size, agency
/// and importance level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualEntry {
    pub size: BlockSize,
    pub agency: AgencyId,
    pub important: bool,
    pub variants: Vec<VisualKey>,
}

impl VisualEntry {
    pub fn new(
        size: BlockSize,
        agency: AgencyId,
        important: bool,
        variants: Vec<VisualKey>,
    ) -> Self {
        Self {
            size,
            agency,
            important,
            variants,
        }
    }
}

/// Catalog defects reported at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no visual entry for {size} slots of agency {agency} (important: {important})")]
    MissingEntry {
        size: BlockSize,
        agency: AgencyId,
        important: bool,
    },

    #[error("visual entry for {size} slots of agency {agency} (important: {important}) has no variants")]
    NoVariants {
        size: BlockSize,
        agency: AgencyId,
        important: bool,
    },
}

/// Lookup table from (size, agency, importance) to visual variants.
///
/// Replaces name-convention lookups: an absent combination is a data
/// defect `validate` reports before any edition is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualCatalog {
    entries: Vec<VisualEntry>,
}

impl VisualCatalog {
    pub fn new(entries: Vec<VisualEntry>) -> Self {
        Self { entries }
    }

    fn entry(&self, size: BlockSize, agency: AgencyId, important: bool) -> Option<&VisualEntry> {
        self.entries
            .iter()
            .find(|e| e.size == size && e.agency == agency && e.important == important)
    }

    /// Pick a visual for the given slot and article, uniformly among the
    /// entry's variants.
    ///
    /// A missing entry or an empty variant list degrades to `None` with a
    /// warning; `validate` reports these up front instead.
    pub fn resolve(
        &self,
        size: BlockSize,
        agency: AgencyId,
        important: bool,
        rng: &mut impl Rng,
    ) -> Option<VisualKey> {
        let Some(entry) = self.entry(size, agency, important) else {
            warn!(%size, %agency, important, "no visual entry for slot");
            return None;
        };
        let picked = entry.variants.choose(rng);
        if picked.is_none() {
            warn!(%size, %agency, important, "visual entry has no variants");
        }
        picked.cloned()
    }

    /// Check that the catalog covers every slot size appearing in `presets`
    /// for every listed agency, at both importance levels.
    pub fn validate(
        &self,
        presets: &[LayoutPreset],
        agencies: &[AgencyId],
    ) -> Result<(), CatalogError> {
        for preset in presets {
            for block in &preset.blocks {
                for &agency in agencies {
                    for important in [false, true] {
                        let entry = self.entry(block.size, agency, important).ok_or(
                            CatalogError::MissingEntry {
                                size: block.size,
                                agency,
                                important,
                            },
                        )?;
                        if entry.variants.is_empty() {
                            return Err(CatalogError::NoVariants {
                                size: block.size,
                                agency,
                                important,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
