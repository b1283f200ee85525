//! Static per-game-type configuration
//!
//! The configuration is the contract between converters, derivers and
//! calculators: it names every metric, its value domain, and every rating and
//! class a game-type produces. It is built at compile time and never mutated.

use super::GameType;
use crate::metrics::EnumValue;
use thiserror::Error;

/// Value domain of a metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricKind {
    /// Whole number in `[min, max]` (no upper bound when `max` is None)
    Integer { min: i64, max: Option<i64> },
    /// Real number in `[min, max]`
    Decimal { min: f64, max: Option<f64> },
    /// One of an ordered list of labels; the position is the ordinal index
    Enum { values: &'static [&'static str] },
}

/// A named metric and its domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub kind: MetricKind,
}

impl MetricSpec {
    pub const fn integer(name: &'static str, min: i64, max: Option<i64>) -> Self {
        Self {
            name,
            kind: MetricKind::Integer { min, max },
        }
    }

    pub const fn decimal(name: &'static str, min: f64, max: Option<f64>) -> Self {
        Self {
            name,
            kind: MetricKind::Decimal { min, max },
        }
    }

    pub const fn enumerated(name: &'static str, values: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: MetricKind::Enum { values },
        }
    }

    /// Ordered value list, if this is an enum metric
    pub fn enum_values(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            MetricKind::Enum { values } => Some(values),
            _ => None,
        }
    }

    /// Ordinal index of `label` within this enum's domain
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.enum_values()?.iter().position(|v| *v == label)
    }

    /// Check a numeric value against this metric's bounds
    pub fn in_range(&self, value: f64) -> bool {
        match self.kind {
            MetricKind::Integer { min, max } => {
                value.fract() == 0.0
                    && value >= min as f64
                    && max.map_or(true, |m| value <= m as f64)
            }
            MetricKind::Decimal { min, max } => {
                value.is_finite() && value >= min && max.map_or(true, |m| value <= m)
            }
            MetricKind::Enum { values } => value >= 0.0 && (value as usize) < values.len(),
        }
    }
}

/// How a personal-best merge rule picks its winning score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Highest metric value (enum metrics compare by index)
    Largest,
    /// Lowest metric value; scores without the metric never win
    Smallest,
    /// Latest achieved timestamp among scores carrying the metric
    MostRecent,
}

/// Personal-best merge rule: the winning score lends `fields` to the PB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbMergeRule {
    /// Reference name recorded in the PB ("Best Lamp", "Lowest BP")
    pub name: &'static str,
    pub strategy: MergeStrategy,
    /// Metric path used for selection ("lamp", "optional.bp", "derived.lamp")
    pub metric: &'static str,
    /// Metric paths copied from the winning score
    pub fields: &'static [&'static str],
}

/// Classification tier domain (e.g. a rating colour)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassSpec {
    pub name: &'static str,
    /// Ascending, lowest tier first
    pub values: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{game_type} has no metric named '{metric}'")]
    UnknownMetric { game_type: GameType, metric: String },

    #[error("{game_type} metric '{metric}' is not an enum")]
    NotAnEnum { game_type: GameType, metric: String },

    #[error("'{label}' is not a valid {metric} for {game_type}")]
    UnknownLabel {
        game_type: GameType,
        metric: String,
        label: String,
    },

    #[error("{game_type} has no class named '{class}'")]
    UnknownClass { game_type: GameType, class: String },
}

/// Declaration of everything one game-type records and computes
#[derive(Debug)]
pub struct GameTypeConfig {
    pub game_type: GameType,
    pub difficulties: &'static [&'static str],
    /// Metrics every score must supply
    pub provided_metrics: &'static [MetricSpec],
    /// Metrics computed by the deriver registry, exactly one value each
    pub derived_metrics: &'static [MetricSpec],
    /// Metrics a score may supply
    pub optional_metrics: &'static [MetricSpec],
    pub judgements: &'static [&'static str],
    /// Metric path ranking the "best score" base of a personal best
    pub default_metric: &'static str,
    pub default_merge_ref_name: &'static str,
    pub pb_merge_rules: &'static [PbMergeRule],
    pub score_ratings: &'static [&'static str],
    pub session_ratings: &'static [&'static str],
    pub profile_ratings: &'static [&'static str],
    pub classes: &'static [ClassSpec],
}

impl GameTypeConfig {
    pub fn provided_metric(&self, name: &str) -> Option<&'static MetricSpec> {
        self.provided_metrics.iter().find(|m| m.name == name)
    }

    pub fn derived_metric(&self, name: &str) -> Option<&'static MetricSpec> {
        self.derived_metrics.iter().find(|m| m.name == name)
    }

    pub fn optional_metric(&self, name: &str) -> Option<&'static MetricSpec> {
        self.optional_metrics.iter().find(|m| m.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&'static ClassSpec> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn has_difficulty(&self, difficulty: &str) -> bool {
        self.difficulties.contains(&difficulty)
    }

    /// Find a provided or derived metric by name
    pub fn metric(&self, name: &str) -> Option<&'static MetricSpec> {
        self.provided_metric(name)
            .or_else(|| self.derived_metric(name))
    }

    /// Turn a canonical label into its (label, index) pair
    pub fn enum_value(&self, metric: &str, label: &str) -> Result<EnumValue, ConfigError> {
        let spec = self
            .metric(metric)
            .or_else(|| self.optional_metric(metric))
            .ok_or_else(|| ConfigError::UnknownMetric {
                game_type: self.game_type,
                metric: metric.to_string(),
            })?;

        if spec.enum_values().is_none() {
            return Err(ConfigError::NotAnEnum {
                game_type: self.game_type,
                metric: metric.to_string(),
            });
        }

        spec.index_of(label)
            .map(|index| EnumValue::new(label, index))
            .ok_or_else(|| ConfigError::UnknownLabel {
                game_type: self.game_type,
                metric: metric.to_string(),
                label: label.to_string(),
            })
    }

    /// Turn a class label into its (label, index) pair
    pub fn class_value(&self, class: &str, label: &str) -> Result<EnumValue, ConfigError> {
        let spec = self.class(class).ok_or_else(|| ConfigError::UnknownClass {
            game_type: self.game_type,
            class: class.to_string(),
        })?;

        spec.values
            .iter()
            .position(|v| *v == label)
            .map(|index| EnumValue::new(label, index))
            .ok_or_else(|| ConfigError::UnknownLabel {
                game_type: self.game_type,
                metric: class.to_string(),
                label: label.to_string(),
            })
    }
}
