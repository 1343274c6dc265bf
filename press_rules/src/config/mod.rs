//! Tuning configuration for import, rotation, selection and layout.
//!
//! Every section has workable defaults; a TOML document only overrides what
//! it names. `EditionConfig::from_toml_str` parses and validates in one step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Violations reported when a config document is loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("size thresholds must increase: short {short} < medium {medium} < long {long}")]
    ThresholdOrder {
        short: usize,
        medium: usize,
        long: usize,
    },

    #[error("area limits must increase: short {short} < medium {medium}")]
    AreaOrder { short: u32, medium: u32 },

    #[error("{kind} offset chances must satisfy 0 <= first <= second <= 1, got {one} and {two}")]
    OffsetOrder {
        kind: &'static str,
        one: f32,
        two: f32,
    },

    #[error("genre count must be at least 1")]
    GenreCount,

    #[error("repeat penalty must lie in [0, 1], got {0}")]
    RepeatPenalty(f32),

    #[error("fifth slot chance must lie in [0, 100], got {0}")]
    FifthSlotChance(f32),

    #[error("hype chance band must satisfy 0 <= min <= max <= 100, got {min} and {max}")]
    HypeBand { min: f32, max: f32 },

    #[error("invalid config document: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Body-length thresholds (in characters) for size classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub short_max_len: usize,
    pub medium_max_len: usize,
    pub long_max_len: usize,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            short_max_len: 300,
            medium_max_len: 600,
            long_max_len: 900,
        }
    }
}

impl SizeThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.short_max_len < self.medium_max_len && self.medium_max_len < self.long_max_len {
            Ok(())
        } else {
            Err(ConfigError::ThresholdOrder {
                short: self.short_max_len,
                medium: self.medium_max_len,
                long: self.long_max_len,
            })
        }
    }
}

/// Slot-area limits (in grid cells) for size classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaLimits {
    pub short_max_area: u32,
    pub medium_max_area: u32,
}

impl Default for AreaLimits {
    fn default() -> Self {
        Self {
            short_max_area: 1,
            medium_max_area: 3,
        }
    }
}

impl AreaLimits {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.short_max_area < self.medium_max_area {
            Ok(())
        } else {
            Err(ConfigError::AreaOrder {
                short: self.short_max_area,
                medium: self.medium_max_area,
            })
        }
    }
}

/// Cumulative breakpoints for story continuation offsets.
///
/// A uniform roll below `offset_one` places the next part one block after
/// the previous one, below `offset_two` two blocks after, otherwise three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetChances {
    pub offset_one: f32,
    pub offset_two: f32,
}

impl Default for OffsetChances {
    fn default() -> Self {
        Self {
            offset_one: 0.4,
            offset_two: 0.75,
        }
    }
}

impl OffsetChances {
    fn validate(&self, kind: &'static str) -> Result<(), ConfigError> {
        let ordered =
            0.0 <= self.offset_one && self.offset_one <= self.offset_two && self.offset_two <= 1.0;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::OffsetOrder {
                kind,
                one: self.offset_one,
                two: self.offset_two,
            })
        }
    }
}

/// Queue rebuild tuning, one breakpoint pair per pool kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub paired: OffsetChances,
    pub unpaired: OffsetChances,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            paired: OffsetChances {
                offset_one: 0.4,
                offset_two: 0.75,
            },
            unpaired: OffsetChances {
                offset_one: 0.5,
                offset_two: 0.8,
            },
        }
    }
}

impl RotationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.paired.validate("paired")?;
        self.unpaired.validate("unpaired")?;
        Ok(())
    }
}

/// Daily selection tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// How many genres contribute a curated pick per build.
    pub genre_count: usize,

    /// Weight multiplier for genres picked on the previous build.
    /// 0.0 is the strongest penalty, 1.0 none.
    pub repeat_penalty: f32,

    /// Whether one pair continuation may join the curated picks.
    pub hype_slot: bool,

    /// Whether a fifth pick is rolled at all.
    pub fifth_slot: bool,

    /// Chance (in percent) that the fifth pick happens.
    pub fifth_slot_chance: f32,

    /// Lower clamp (in percent) on a continuation candidate's chance.
    pub min_hype_chance: f32,

    /// Upper clamp (in percent) on a continuation candidate's chance.
    pub max_hype_chance: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            genre_count: 3,
            repeat_penalty: 0.5,
            hype_slot: true,
            fifth_slot: true,
            fifth_slot_chance: 50.0,
            min_hype_chance: 5.0,
            max_hype_chance: 90.0,
        }
    }
}

impl SelectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.genre_count == 0 {
            return Err(ConfigError::GenreCount);
        }
        if !(0.0..=1.0).contains(&self.repeat_penalty) {
            return Err(ConfigError::RepeatPenalty(self.repeat_penalty));
        }
        if !(0.0..=100.0).contains(&self.fifth_slot_chance) {
            return Err(ConfigError::FifthSlotChance(self.fifth_slot_chance));
        }
        let band_ok = 0.0 <= self.min_hype_chance
            && self.min_hype_chance <= self.max_hype_chance
            && self.max_hype_chance <= 100.0;
        if !band_ok {
            return Err(ConfigError::HypeBand {
                min: self.min_hype_chance,
                max: self.max_hype_chance,
            });
        }
        Ok(())
    }
}

/// Complete tuning surface of the newspaper pipeline.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditionConfig {
    pub sizing: SizeThresholds,
    pub areas: AreaLimits,
    pub rotation: RotationConfig,
    pub selection: SelectionConfig,
}

impl EditionConfig {
    /// Parse a TOML document and validate it. Absent sections keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sizing.validate()?;
        self.areas.validate()?;
        self.rotation.validate()?;
        self.selection.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EditionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EditionConfig::from_toml_str(
            r#"
            [selection]
            genre_count = 2
            repeat_penalty = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.selection.genre_count, 2);
        assert!((config.selection.repeat_penalty - 0.25).abs() < 0.001);
        // Untouched sections stay at their defaults.
        assert_eq!(config.sizing.short_max_len, 300);
        assert_eq!(config.areas.medium_max_area, 3);
    }

    #[test]
    fn test_offset_order_rejected() {
        let err = EditionConfig::from_toml_str(
            r#"
            [rotation.paired]
            offset_one = 0.9
            offset_two = 0.2
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::OffsetOrder { kind: "paired", .. }
        ));
    }

    #[test]
    fn test_threshold_order_rejected() {
        let config = EditionConfig {
            sizing: SizeThresholds {
                short_max_len: 500,
                medium_max_len: 400,
                long_max_len: 900,
            },
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_hype_band_rejected() {
        let mut config = EditionConfig::default();
        config.selection.min_hype_chance = 60.0;
        config.selection.max_hype_chance = 10.0;

        assert!(matches!(config.validate(), Err(ConfigError::HypeBand { .. })));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            EditionConfig::from_toml_str("selection = 3"),
            Err(ConfigError::Toml(_))
        ));
    }
}
