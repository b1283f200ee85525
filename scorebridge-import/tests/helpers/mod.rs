//! Test Helper Utilities
//!
//! Shared setup for scorebridge-import integration tests

#![allow(dead_code)]

use scorebridge_common::config::ImportSettings;
use scorebridge_common::db::init_database;
use scorebridge_common::models::{ChartRef, SongRef, TierlistValue};
use scorebridge_common::{Game, GameType};
use scorebridge_import::{ChartKey, ScoreImporter, ScoreStore, SqliteReferenceStore};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const BMS_HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

/// Importer over a fresh database; keep the TempDir alive for the test
pub struct TestEnv {
    pub _dir: TempDir,
    pub importer: Arc<ScoreImporter>,
    pub references: SqliteReferenceStore,
}

pub async fn create_test_env() -> TestEnv {
    let dir = TempDir::new().expect("temp dir");
    let pool = init_database(&dir.path().join("scorebridge.db"))
        .await
        .expect("database");

    let references = SqliteReferenceStore::new(pool.clone());
    let importer = ScoreImporter::new(
        Arc::new(references.clone()),
        ScoreStore::new(pool, 5000),
        ImportSettings::default(),
    );

    TestEnv {
        _dir: dir,
        importer: Arc::new(importer),
        references,
    }
}

pub fn song(game: Game, song_id: i64, title: &str) -> SongRef {
    SongRef {
        game,
        song_id,
        title: title.into(),
        artist: "Test Artist".into(),
        data: Value::Null,
    }
}

pub fn chart(
    chart_id: &str,
    song_id: i64,
    game_type: GameType,
    difficulty: &str,
    level: f64,
    note_count: Option<u32>,
    tiers: &[(&str, Option<f64>)],
) -> ChartRef {
    let tierlist: BTreeMap<String, TierlistValue> = tiers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                TierlistValue {
                    value: *value,
                    text: None,
                },
            )
        })
        .collect();

    ChartRef {
        chart_id: chart_id.into(),
        song_id,
        game_type,
        difficulty: difficulty.into(),
        level: level.to_string(),
        level_num: level,
        note_count,
        tierlist,
        data: Value::Null,
    }
}

/// The bms:7K chart the beatoraja fixtures resolve to
pub async fn seed_bms_chart(references: &SqliteReferenceStore, with_song: bool) {
    if with_song {
        references
            .insert_song(&song(Game::Bms, 3, "bms song"))
            .await
            .expect("song");
    }
    references
        .insert_chart(
            &chart(
                "bms-chart",
                3,
                GameType::Bms7K,
                "CHART",
                5.0,
                Some(1000),
                &[("sgl-EC", Some(5.5)), ("sgl-HC", Some(7.0))],
            ),
            &[ChartKey::Sha256 {
                hash: BMS_HASH.into(),
            }],
        )
        .await
        .expect("chart");
}

/// The sdvx:Single chart the kshook fixtures resolve to
pub async fn seed_sdvx_chart(references: &SqliteReferenceStore) {
    references
        .insert_song(&song(Game::Sdvx, 11, "sdvx song"))
        .await
        .expect("song");
    references
        .insert_chart(
            &chart("sdvx-mxm", 11, GameType::SdvxSingle, "MXM", 18.0, None, &[]),
            &[ChartKey::InGameId {
                in_game_id: 11,
                difficulty: "MXM".into(),
                version: Some("konaste".into()),
            }],
        )
        .await
        .expect("chart");
}

pub fn kshook_score(score: i64) -> Value {
    json!({
        "music_id": 11,
        "difficulty": "DIFFICULTY_MAXIMUM",
        "clear": "CLEAR_EFFECTIVE",
        "score": score,
        "critical": 1000,
        "near": 10,
        "error": 2,
        "gauge": 7500,
        "max_chain": 900,
        "ex_score": 2500
    })
}

pub fn kshook_context() -> Value {
    json!({"timeReceived": 1_700_000_000_000i64})
}

pub fn beatoraja_score(exscore: i64, clear: &str) -> Value {
    json!({
        "sha256": BMS_HASH,
        "mode": "BEAT_7K",
        "exscore": exscore,
        "clear": clear,
        "minbp": 12,
        "maxcombo": 400,
        "gauge": 80.5,
        "epg": 300, "lpg": 250,
        "egr": 100, "lgr": 80,
        "egd": 5, "lgd": 3,
        "ebd": 2, "lbd": 1,
        "epr": 4, "lpr": 2,
        "ems": 1, "lms": 0
    })
}

pub fn beatoraja_context() -> Value {
    json!({"client": "beatoraja", "timeReceived": 1_700_000_000_000i64})
}
