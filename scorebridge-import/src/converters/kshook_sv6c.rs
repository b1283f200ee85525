//! `ir/kshook-sv6c`: SOUND VOLTEX EXCEED GEAR (Konaste) scores from kshook

use super::score_utils::{map_source, parse_input, resolve_references, ScoreDataBuilder};
use super::ConverterOutput;
use crate::diagnostics::DiagnosticSink;
use crate::error::ImportResult;
use crate::resolver::{ChartKey, ReferenceResolver};
use scorebridge_common::metrics::MetricValue;
use scorebridge_common::models::DryScore;
use scorebridge_common::{GameType, ImportType};
use serde::Deserialize;
use serde_json::Value;

pub const SERVICE: &str = "kshook SV6C";
const VERSION: &str = "konaste";

#[derive(Debug, Deserialize)]
pub struct KsHookSv6cScore {
    pub music_id: i64,
    pub difficulty: String,
    pub clear: String,
    pub score: i64,
    pub critical: i64,
    pub near: i64,
    pub error: i64,
    /// Effective gauge in hundredths of a percent
    pub gauge: i64,
    pub max_chain: i64,
    pub ex_score: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KsHookSv6cContext {
    pub time_received: i64,
}

const DIFFICULTIES: &[(&str, &str)] = &[
    ("DIFFICULTY_NOVICE", "NOV"),
    ("DIFFICULTY_ADVANCED", "ADV"),
    ("DIFFICULTY_EXHAUST", "EXH"),
    ("DIFFICULTY_INFINITE", "ANY_INF"),
    ("DIFFICULTY_MAXIMUM", "MXM"),
];

const CLEARS: &[(&str, &str)] = &[
    ("CLEAR_PLAYED", "FAILED"),
    ("CLEAR_EFFECTIVE", "CLEAR"),
    ("CLEAR_EXCESSIVE", "EXCESSIVE CLEAR"),
    ("CLEAR_ULTIMATE_CHAIN", "ULTIMATE CHAIN"),
    ("CLEAR_PERFECT", "PERFECT ULTIMATE CHAIN"),
];

pub async fn convert(
    data: &Value,
    context: &Value,
    resolver: &dyn ReferenceResolver,
    diag: &dyn DiagnosticSink,
) -> ImportResult<ConverterOutput> {
    let score: KsHookSv6cScore = parse_input(data, "kshook SV6C score")?;
    let ctx: KsHookSv6cContext = parse_input(context, "kshook SV6C context")?;

    let difficulty = map_source(DIFFICULTIES, score.difficulty.as_str(), "kshook difficulty")?;
    let lamp = map_source(CLEARS, score.clear.as_str(), "kshook clear")?;

    let game_type = GameType::SdvxSingle;
    let key = ChartKey::InGameId {
        in_game_id: score.music_id,
        difficulty: difficulty.to_string(),
        version: Some(VERSION.to_string()),
    };
    let (chart, song) = resolve_references(
        ImportType::KsHookSv6c,
        game_type,
        &key,
        data,
        context,
        resolver,
        diag,
    )
    .await?;

    let score_data = ScoreDataBuilder::new(game_type)
        .integer("score", score.score)
        .label("lamp", lamp)?
        .judgement("critical", Some(score.critical))
        .judgement("near", Some(score.near))
        .judgement("miss", Some(score.error))
        .optional("gauge", Some(MetricValue::Decimal(score.gauge as f64 / 100.0)))
        .optional("maxCombo", Some(MetricValue::Integer(score.max_chain)))
        .optional("exScore", Some(MetricValue::Integer(score.ex_score)))
        .build()?;

    let dry_score = DryScore {
        game_type,
        service: SERVICE.to_string(),
        import_type: ImportType::KsHookSv6c,
        time_achieved: Some(ctx.time_received),
        comment: None,
        score_data,
        score_meta: Value::Object(Default::default()),
    };

    Ok(ConverterOutput {
        dry_score,
        chart,
        song,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CaptureSink, Severity};
    use crate::error::ImportFailure;
    use crate::resolver::InMemoryReferenceStore;
    use scorebridge_common::models::{ChartRef, SongRef};
    use scorebridge_common::Game;
    use serde_json::json;

    async fn store(with_song: bool) -> InMemoryReferenceStore {
        let store = InMemoryReferenceStore::new();
        if with_song {
            store
                .insert_song(SongRef {
                    game: Game::Sdvx,
                    song_id: 1,
                    title: "Booths of Fighters".into(),
                    artist: "Various".into(),
                    data: Value::Null,
                })
                .await;
        }
        store
            .insert_chart(
                ChartRef {
                    chart_id: "sdvx-1-exh".into(),
                    song_id: 1,
                    game_type: GameType::SdvxSingle,
                    difficulty: "EXH".into(),
                    level: "17".into(),
                    level_num: 17.0,
                    note_count: None,
                    tierlist: Default::default(),
                    data: Value::Null,
                },
                &[ChartKey::InGameId {
                    in_game_id: 1,
                    difficulty: "EXH".into(),
                    version: Some("konaste".into()),
                }],
            )
            .await;
        store
    }

    fn raw(clear: &str, difficulty: &str) -> Value {
        json!({
            "music_id": 1,
            "difficulty": difficulty,
            "clear": clear,
            "score": 9_500_000,
            "critical": 1200,
            "near": 30,
            "error": 4,
            "gauge": 8250,
            "max_chain": 900,
            "ex_score": 3000
        })
    }

    #[tokio::test]
    async fn test_converts_known_chart() {
        let store = store(true).await;
        let diag = CaptureSink::new();
        let out = convert(
            &raw("CLEAR_EXCESSIVE", "DIFFICULTY_EXHAUST"),
            &json!({"timeReceived": 1000}),
            &store,
            &diag,
        )
        .await
        .unwrap();

        let data = &out.dry_score.score_data;
        assert_eq!(data.enum_value("lamp").unwrap().label, "EXCESSIVE CLEAR");
        assert_eq!(data.optional_number("gauge"), Some(82.5));
        assert_eq!(data.judgements["miss"], Some(4));
        assert_eq!(out.dry_score.time_achieved, Some(1000));
        assert_eq!(out.chart.chart_id, "sdvx-1-exh");
    }

    #[tokio::test]
    async fn test_missing_chart_is_reference_not_found() {
        let store = store(true).await;
        let diag = CaptureSink::new();
        let data = raw("CLEAR_EFFECTIVE", "DIFFICULTY_MAXIMUM");
        let context = json!({"timeReceived": 1000});

        match convert(&data, &context, &store, &diag).await {
            Err(ImportFailure::ReferenceNotFound {
                import_type,
                data: carried,
                ..
            }) => {
                assert_eq!(import_type, ImportType::KsHookSv6c);
                assert_eq!(carried, data);
            }
            other => panic!("expected ReferenceNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chart_without_song_is_internal() {
        let store = store(false).await;
        let diag = CaptureSink::new();
        let result = convert(
            &raw("CLEAR_EFFECTIVE", "DIFFICULTY_EXHAUST"),
            &json!({"timeReceived": 1}),
            &store,
            &diag,
        )
        .await;

        assert!(matches!(result, Err(ImportFailure::Internal(_))));
        assert_eq!(diag.count(Severity::Severe), 0);
        assert!(diag
            .records()
            .iter()
            .any(|d| d.field("chart_id") == Some("sdvx-1-exh")));
    }

    #[tokio::test]
    async fn test_unmapped_clear_is_internal() {
        let store = store(true).await;
        let diag = CaptureSink::new();
        let result = convert(
            &raw("CLEAR_SUPER", "DIFFICULTY_EXHAUST"),
            &json!({"timeReceived": 1}),
            &store,
            &diag,
        )
        .await;
        assert!(matches!(result, Err(ImportFailure::Internal(_))));
    }

    #[tokio::test]
    async fn test_score_outside_domain_is_converter_failure() {
        let store = store(true).await;
        let diag = CaptureSink::new();

        for score in [-1, 20_000_000] {
            let mut data = raw("CLEAR_EFFECTIVE", "DIFFICULTY_EXHAUST");
            data["score"] = json!(score);
            match convert(&data, &json!({"timeReceived": 1}), &store, &diag).await {
                Err(ImportFailure::Converter(msg)) => {
                    assert_eq!(msg, format!("Invalid score of {}: out of range.", score))
                }
                other => panic!("score {} gave {:?}", score, other),
            }
        }

        let mut data = raw("CLEAR_EFFECTIVE", "DIFFICULTY_EXHAUST");
        data["gauge"] = json!(-100);
        let result = convert(&data, &json!({"timeReceived": 1}), &store, &diag).await;
        assert!(matches!(result, Err(ImportFailure::Converter(_))));
        assert_eq!(diag.count(Severity::Severe), 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_converter_failure() {
        let store = store(true).await;
        let diag = CaptureSink::new();
        let result = convert(&json!({"music_id": "x"}), &json!({"timeReceived": 1}), &store, &diag).await;
        assert!(matches!(result, Err(ImportFailure::Converter(_))));
    }
}
