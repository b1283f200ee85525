//! Canonical, persisted and reference models

use crate::game::{Game, GameType, ImportType};
use crate::metrics::{EnumValue, ScoreData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User identifier
pub type UserId = i64;

/// Per-chart tier-list entry; either part may be unknown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierlistValue {
    pub value: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Chart reference data (read-only to the pipeline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRef {
    pub chart_id: String,
    pub song_id: i64,
    pub game_type: GameType,
    pub difficulty: String,
    /// Level as displayed ("12", "★5", "10+")
    pub level: String,
    pub level_num: f64,
    #[serde(default)]
    pub note_count: Option<u32>,
    #[serde(default)]
    pub tierlist: BTreeMap<String, TierlistValue>,
    /// Hashes, in-game ids, versions
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ChartRef {
    /// Tier value, if the tier exists and carries a number
    pub fn tier_value(&self, tier: &str) -> Option<f64> {
        self.tierlist.get(tier).and_then(|t| t.value)
    }
}

/// Song reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRef {
    pub game: Game,
    pub song_id: i64,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Canonical in-flight score produced by a converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryScore {
    pub game_type: GameType,
    pub service: String,
    pub import_type: ImportType,
    /// Unix milliseconds
    pub time_achieved: Option<i64>,
    pub comment: Option<String>,
    pub score_data: ScoreData,
    #[serde(default)]
    pub score_meta: serde_json::Value,
}

/// Persisted score document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub score_id: String,
    pub user_id: UserId,
    pub game_type: GameType,
    pub chart_id: String,
    pub song_id: i64,
    pub import_type: ImportType,
    pub service: String,
    pub comment: Option<String>,
    pub time_achieved: Option<i64>,
    pub time_added: i64,
    pub score_data: ScoreData,
    #[serde(default)]
    pub score_meta: serde_json::Value,
    /// Per-score ratings; `None` when a calculator has no value for this score
    #[serde(default)]
    pub calculated: BTreeMap<String, Option<f64>>,
}

/// Which score contributed a personal-best reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbReference {
    pub name: String,
    pub score_id: String,
}

/// Merged best record for one user on one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    pub user_id: UserId,
    pub chart_id: String,
    pub song_id: i64,
    pub game_type: GameType,
    pub time_achieved: Option<i64>,
    pub score_data: ScoreData,
    pub composed_from: Vec<PbReference>,
    #[serde(default)]
    pub calculated: BTreeMap<String, Option<f64>>,
}

/// Submission that could not be resolved against known charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanRecord {
    pub orphan_id: String,
    pub import_type: ImportType,
    pub user_id: UserId,
    pub data: serde_json::Value,
    pub context: serde_json::Value,
    pub err_msg: Option<String>,
    pub time_inserted: i64,
}

/// Profile ratings and classes for one user on one game-type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub user_id: UserId,
    pub game_type: GameType,
    pub ratings: BTreeMap<String, Option<f64>>,
    pub classes: BTreeMap<String, EnumValue>,
    pub time_updated: i64,
}

/// Failure recorded against one item of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportErrorEntry {
    pub kind: String,
    pub message: String,
}

/// Summary of one import run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    pub import_id: String,
    pub user_id: UserId,
    pub import_type: ImportType,
    pub score_ids: Vec<String>,
    pub orphan_ids: Vec<String>,
    pub errors: Vec<ImportErrorEntry>,
    /// Session ratings per game-type touched by the import
    pub session_ratings: BTreeMap<GameType, BTreeMap<String, Option<f64>>>,
    pub time_started: i64,
    pub time_finished: i64,
}
