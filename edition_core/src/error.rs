//! Error taxonomy for edition builds.
//!
//! Data inconsistencies are warned about and excluded where they are found;
//! the variants here are the failures that abort a build outright.

use press_rules::{CategoryCounts, PoolRole, SizeCategory};
use thiserror::Error;

/// One preset's important-slot counts, reported next to the required
/// counts when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFit {
    pub name: String,
    pub important: CategoryCounts,
}

/// Fatal failures of an edition build. No partial output is emitted.
#[derive(Debug, Error)]
pub enum EditionError {
    /// The featured queue ran dry at pick time.
    #[error("featured pool '{pool}' has no queued article left")]
    FeaturedPoolExhausted { pool: String },

    /// No preset's important slots matched the selected articles.
    #[error(
        "no preset offers important slots for {required}; available: {}",
        format_fits(.catalog)
    )]
    NoMatchingPreset {
        required: CategoryCounts,
        catalog: Vec<PresetFit>,
    },

    /// An important article could not be bound even though a preset
    /// matched, which means selection and matching disagree.
    #[error("no free important {category} slot for '{headline}'")]
    SlotBindingConflict {
        headline: String,
        category: SizeCategory,
    },

    /// The pool set is missing a role the build requires.
    #[error("no pool with role {role:?} registered")]
    MissingPool { role: PoolRole },
}

fn format_fits(fits: &[PresetFit]) -> String {
    if fits.is_empty() {
        return "no presets registered".to_string();
    }
    fits.iter()
        .map(|fit| format!("{} ({})", fit.name, fit.important))
        .collect::<Vec<_>>()
        .join("; ")
}
