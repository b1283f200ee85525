//! Metric values and score data containers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Enum metric value carried as (label, ordinal index)
///
/// Comparisons between enum values use the index, never the label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    pub label: String,
    pub index: usize,
}

impl EnumValue {
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            index,
        }
    }
}

/// A single metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Decimal(f64),
    Enum(EnumValue),
}

impl MetricValue {
    /// Numeric view used for comparisons; enum values compare by index
    pub fn ordinal(&self) -> f64 {
        match self {
            MetricValue::Integer(v) => *v as f64,
            MetricValue::Decimal(v) => *v,
            MetricValue::Enum(e) => e.index as f64,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(v) => Some(*v as f64),
            MetricValue::Decimal(v) => Some(*v),
            MetricValue::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            MetricValue::Enum(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EnumValue> for MetricValue {
    fn from(value: EnumValue) -> Self {
        MetricValue::Enum(value)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("metric '{0}' is missing")]
    Missing(String),

    #[error("metric '{name}' is not {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
    },
}

/// Game-type specific score payload
///
/// `metrics` holds the provided (primary) metrics, `derived` is filled in once
/// by the deriver registry. Metric paths address the sections as `"lamp"`,
/// `"optional.bp"` and `"derived.grade"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreData {
    pub metrics: BTreeMap<String, MetricValue>,
    #[serde(default)]
    pub judgements: BTreeMap<String, Option<i64>>,
    #[serde(default)]
    pub optional: BTreeMap<String, MetricValue>,
    #[serde(default)]
    pub derived: BTreeMap<String, MetricValue>,
}

impl ScoreData {
    fn required(&self, name: &str) -> Result<&MetricValue, MetricError> {
        self.metrics
            .get(name)
            .ok_or_else(|| MetricError::Missing(name.to_string()))
    }

    pub fn integer(&self, name: &str) -> Result<i64, MetricError> {
        match self.required(name)? {
            MetricValue::Integer(v) => Ok(*v),
            _ => Err(MetricError::WrongType {
                name: name.to_string(),
                expected: "an integer",
            }),
        }
    }

    /// Integer or decimal primary metric as f64
    pub fn number(&self, name: &str) -> Result<f64, MetricError> {
        self.required(name)?
            .as_number()
            .ok_or_else(|| MetricError::WrongType {
                name: name.to_string(),
                expected: "numeric",
            })
    }

    pub fn enum_value(&self, name: &str) -> Result<&EnumValue, MetricError> {
        self.required(name)?
            .as_enum()
            .ok_or_else(|| MetricError::WrongType {
                name: name.to_string(),
                expected: "an enum",
            })
    }

    /// Derived enum metric (e.g. popn's lamp)
    pub fn derived_enum(&self, name: &str) -> Result<&EnumValue, MetricError> {
        let value = self
            .derived
            .get(name)
            .ok_or_else(|| MetricError::Missing(format!("derived.{}", name)))?;
        value.as_enum().ok_or_else(|| MetricError::WrongType {
            name: format!("derived.{}", name),
            expected: "an enum",
        })
    }

    pub fn optional_number(&self, name: &str) -> Option<f64> {
        self.optional.get(name).and_then(MetricValue::as_number)
    }

    /// Resolve a metric path to its value
    pub fn get_path(&self, path: &str) -> Option<&MetricValue> {
        match path.split_once('.') {
            Some(("optional", name)) => self.optional.get(name),
            Some(("derived", name)) => self.derived.get(name),
            Some(_) => None,
            None => self.metrics.get(path),
        }
    }

    /// Set (or clear, with `None`) the value at a metric path
    pub fn set_path(&mut self, path: &str, value: Option<MetricValue>) {
        let (section, name) = match path.split_once('.') {
            Some(("optional", name)) => (&mut self.optional, name),
            Some(("derived", name)) => (&mut self.derived, name),
            Some(_) => return,
            None => (&mut self.metrics, path),
        };
        match value {
            Some(v) => {
                section.insert(name.to_string(), v);
            }
            None => {
                section.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScoreData {
        let mut data = ScoreData::default();
        data.metrics
            .insert("score".into(), MetricValue::Integer(1500));
        data.metrics
            .insert("lamp".into(), EnumValue::new("HARD CLEAR", 5).into());
        data.optional.insert("bp".into(), MetricValue::Integer(12));
        data
    }

    #[test]
    fn test_typed_accessors() {
        let data = sample();
        assert_eq!(data.integer("score").unwrap(), 1500);
        assert_eq!(data.number("score").unwrap(), 1500.0);
        assert_eq!(data.enum_value("lamp").unwrap().index, 5);
        assert_eq!(
            data.integer("lamp"),
            Err(MetricError::WrongType {
                name: "lamp".into(),
                expected: "an integer"
            })
        );
        assert_eq!(data.number("percent"), Err(MetricError::Missing("percent".into())));
    }

    #[test]
    fn test_metric_paths() {
        let mut data = sample();
        assert_eq!(data.get_path("optional.bp"), Some(&MetricValue::Integer(12)));
        assert!(data.get_path("derived.grade").is_none());

        data.set_path("derived.grade", Some(EnumValue::new("AA", 6).into()));
        assert_eq!(data.derived_enum("grade").unwrap().label, "AA");

        data.set_path("optional.bp", None);
        assert!(data.optional_number("bp").is_none());
        assert!(data.get_path("bogus.bp").is_none());
    }

    #[test]
    fn test_untagged_serialization() {
        let data = sample();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["metrics"]["score"], serde_json::json!(1500));
        assert_eq!(
            json["metrics"]["lamp"],
            serde_json::json!({"label": "HARD CLEAR", "index": 5})
        );

        let back: ScoreData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);

        let decimal: MetricValue = serde_json::from_str("98.5").unwrap();
        assert_eq!(decimal, MetricValue::Decimal(98.5));
    }
}
