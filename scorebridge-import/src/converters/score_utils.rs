//! Helpers shared by the converters

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::{ImportFailure, ImportResult};
use crate::resolver::{ChartKey, ReferenceResolver};
use scorebridge_common::game::{MetricKind, MetricSpec};
use scorebridge_common::metrics::{MetricValue, ScoreData};
use scorebridge_common::models::{ChartRef, SongRef};
use scorebridge_common::{GameType, ImportType};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Deserialize raw submission data; malformed input is a converter failure
pub fn parse_input<T: DeserializeOwned>(value: &Value, what: &str) -> ImportResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| ImportFailure::Converter(format!("Invalid {}: {}", what, e)))
}

/// Look a source value up in a static mapping table
///
/// Tables must cover every value the source can send, so a miss means the
/// table is out of date and is reported as an internal failure.
pub fn map_source<K, V>(table: &[(K, V)], key: K, what: &str) -> ImportResult<V>
where
    K: PartialEq + fmt::Display,
    V: Copy,
{
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| ImportFailure::Internal(format!("Unmapped {} '{}'", what, key)))
}

/// Find the chart for `key` and its parent song
///
/// No chart → reference-not-found (the submission will be orphaned).
/// A chart whose song is missing is broken reference data → internal.
pub async fn resolve_references(
    import_type: ImportType,
    game_type: GameType,
    key: &ChartKey,
    data: &Value,
    context: &Value,
    resolver: &dyn ReferenceResolver,
    diag: &dyn DiagnosticSink,
) -> ImportResult<(ChartRef, SongRef)> {
    let chart = resolver.find_chart(game_type, key).await?.ok_or_else(|| {
        ImportFailure::reference_not_found(
            import_type,
            data,
            context,
            format!("Could not find chart with {} ({}).", key, game_type),
        )
    })?;

    let game = game_type.game();
    let song = match resolver.find_song(game, chart.song_id).await? {
        Some(song) => song,
        None => {
            let msg = format!("Chart {} points at song {} ({}), which does not exist.", chart.chart_id, chart.song_id, game);
            diag.emit(
                Diagnostic::new(Severity::Debug, msg.clone()).with("chart_id", &chart.chart_id),
            );
            return Err(ImportFailure::Internal(msg));
        }
    };

    Ok((chart, song))
}

/// Checks that need the chart: EX score cannot exceed two per note
pub fn check_chart_bounds(game_type: GameType, data: &ScoreData, chart: &ChartRef) -> ImportResult<()> {
    match game_type {
        GameType::IidxSp
        | GameType::IidxDp
        | GameType::Bms7K
        | GameType::Bms14K
        | GameType::PmsController
        | GameType::PmsKeyboard => {
            let Some(notes) = chart.note_count else {
                return Ok(());
            };
            let score = data.integer("score")?;
            let max = i64::from(notes) * 2;
            if score > max {
                return Err(ImportFailure::Converter(format!(
                    "EX score of {} is greater than the maximum possible EX score ({}) for this chart.",
                    score, max
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Builds a [`ScoreData`] and checks it against the game-type schema
pub struct ScoreDataBuilder {
    game_type: GameType,
    data: ScoreData,
}

impl ScoreDataBuilder {
    pub fn new(game_type: GameType) -> Self {
        Self {
            game_type,
            data: ScoreData::default(),
        }
    }

    pub fn integer(mut self, name: &str, value: i64) -> Self {
        self.data
            .metrics
            .insert(name.to_string(), MetricValue::Integer(value));
        self
    }

    pub fn decimal(mut self, name: &str, value: f64) -> Self {
        self.data
            .metrics
            .insert(name.to_string(), MetricValue::Decimal(value));
        self
    }

    /// Already validated value of any kind
    pub fn metric(mut self, name: &str, value: MetricValue) -> Self {
        self.data.metrics.insert(name.to_string(), value);
        self
    }

    /// Canonical enum label; a label the configuration lacks is internal
    pub fn label(mut self, name: &str, label: &str) -> ImportResult<Self> {
        let value = self.game_type.config().enum_value(name, label)?;
        self.data.metrics.insert(name.to_string(), value.into());
        Ok(self)
    }

    pub fn judgement(mut self, name: &str, value: Option<i64>) -> Self {
        self.data.judgements.insert(name.to_string(), value);
        self
    }

    pub fn optional(mut self, name: &str, value: Option<MetricValue>) -> Self {
        if let Some(value) = value {
            self.data.optional.insert(name.to_string(), value);
        }
        self
    }

    /// Check every metric against its configured domain
    ///
    /// A value outside its domain came from the submission and is a converter
    /// failure. A missing or unknown metric means the converter and the
    /// configuration disagree, which is internal.
    pub fn build(self) -> ImportResult<ScoreData> {
        let config = self.game_type.config();
        for spec in config.provided_metrics {
            if !self.data.metrics.contains_key(spec.name) {
                return Err(ImportFailure::Internal(format!(
                    "{} score is missing provided metric '{}'",
                    self.game_type, spec.name
                )));
            }
        }

        let provided = self
            .data
            .metrics
            .iter()
            .map(|(name, value)| (name, value, config.provided_metric(name)));
        let optional = self
            .data
            .optional
            .iter()
            .map(|(name, value)| (name, value, config.optional_metric(name)));

        for (name, value, spec) in provided.chain(optional) {
            let Some(spec) = spec else {
                return Err(ImportFailure::Internal(format!(
                    "{} has no metric '{}'",
                    self.game_type, name
                )));
            };
            check_domain(spec, name, value)?;
        }

        Ok(self.data)
    }
}

fn check_domain(spec: &MetricSpec, name: &str, value: &MetricValue) -> ImportResult<()> {
    let in_range = match (value, spec.kind) {
        (MetricValue::Enum(e), MetricKind::Enum { values }) => {
            values.get(e.index).map_or(false, |label| *label == e.label)
        }
        (MetricValue::Integer(v), MetricKind::Integer { .. }) => spec.in_range(*v as f64),
        (MetricValue::Decimal(v), MetricKind::Decimal { .. }) => spec.in_range(*v),
        (MetricValue::Integer(v), MetricKind::Decimal { .. }) => spec.in_range(*v as f64),
        _ => {
            return Err(ImportFailure::Internal(format!(
                "Metric '{}' has the wrong kind: {:?}",
                name, value
            )))
        }
    };

    if in_range {
        Ok(())
    } else {
        Err(ImportFailure::Converter(format!(
            "Invalid {} of {}: out of range.",
            name,
            display_value(value)
        )))
    }
}

fn display_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Integer(v) => v.to_string(),
        MetricValue::Decimal(v) => v.to_string(),
        MetricValue::Enum(e) => e.label.to_string(),
    }
}
