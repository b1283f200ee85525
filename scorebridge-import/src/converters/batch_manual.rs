//! `file/batch-manual`: the generic JSON format accepted for every game-type
//!
//! A batch-manual file is `{ meta: { game, playtype, service, version? },
//! scores: [...] }`. Metrics are written by hand or by third-party tools, so
//! everything here is user input: bad values are converter failures, not
//! internal ones.

use super::score_utils::{check_chart_bounds, parse_input, resolve_references, ScoreDataBuilder};
use super::ConverterOutput;
use crate::diagnostics::DiagnosticSink;
use crate::error::{ImportFailure, ImportResult};
use crate::resolver::{ChartKey, ReferenceResolver};
use scorebridge_common::game::{MetricKind, MetricSpec};
use scorebridge_common::metrics::{EnumValue, MetricValue};
use scorebridge_common::models::DryScore;
use scorebridge_common::{GameType, ImportType};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchManualScore {
    /// inGameID, sha256, md5 or title
    pub match_type: String,
    pub identifier: Value,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub time_achieved: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub judgements: BTreeMap<String, Option<i64>>,
    #[serde(default)]
    pub optional: Map<String, Value>,
    /// Provided metrics sit at the top level of each item
    #[serde(flatten)]
    pub metrics: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchManualContext {
    pub game_type: GameType,
    pub service: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchManualMeta {
    game: String,
    playtype: String,
    service: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchManualFile {
    meta: BatchManualMeta,
    scores: Vec<Value>,
}

/// Split a batch-manual document into the shared context and its items
pub fn parse_file(file: &Value) -> ImportResult<(Value, Vec<Value>)> {
    let doc: BatchManualFile = parse_input(file, "batch-manual file")?;

    let id = format!("{}:{}", doc.meta.game, doc.meta.playtype);
    let game_type: GameType = id.parse().map_err(|_| {
        ImportFailure::Converter(format!("Unsupported game/playtype combination {}.", id))
    })?;

    let context = json!({
        "gameType": game_type,
        "service": doc.meta.service,
        "version": doc.meta.version,
    });
    Ok((context, doc.scores))
}

fn invalid(msg: String) -> ImportFailure {
    ImportFailure::Converter(msg)
}

/// Check a user-supplied value against its metric domain
fn read_metric(spec: &MetricSpec, value: &Value, path: &str) -> ImportResult<MetricValue> {
    match spec.kind {
        MetricKind::Integer { .. } => {
            let v = value
                .as_i64()
                .ok_or_else(|| invalid(format!("Invalid {}: expected an integer, got {}.", path, value)))?;
            if !spec.in_range(v as f64) {
                return Err(invalid(format!("Invalid {} of {}: out of range.", path, v)));
            }
            Ok(MetricValue::Integer(v))
        }
        MetricKind::Decimal { .. } => {
            let v = value
                .as_f64()
                .ok_or_else(|| invalid(format!("Invalid {}: expected a number, got {}.", path, value)))?;
            if !spec.in_range(v) {
                return Err(invalid(format!("Invalid {} of {}: out of range.", path, v)));
            }
            Ok(MetricValue::Decimal(v))
        }
        MetricKind::Enum { values } => {
            let label = value
                .as_str()
                .ok_or_else(|| invalid(format!("Invalid {}: expected a string, got {}.", path, value)))?;
            let index = spec.index_of(label).ok_or_else(|| {
                invalid(format!(
                    "Invalid {} '{}'. Expected one of {}.",
                    path,
                    label,
                    values.join(", ")
                ))
            })?;
            Ok(EnumValue::new(label, index).into())
        }
    }
}

fn identifier_string(identifier: &Value) -> ImportResult<String> {
    match identifier {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(format!("Invalid identifier {}.", other))),
    }
}

fn require_difficulty(
    game_type: GameType,
    difficulty: Option<&str>,
    match_type: &str,
) -> ImportResult<String> {
    let difficulty = difficulty.ok_or_else(|| {
        invalid(format!("matchType {} requires a difficulty.", match_type))
    })?;
    if !game_type.config().has_difficulty(difficulty) {
        return Err(invalid(format!(
            "Invalid difficulty '{}' for {}.",
            difficulty, game_type
        )));
    }
    Ok(difficulty.to_string())
}

fn chart_key(
    game_type: GameType,
    score: &BatchManualScore,
    version: Option<&str>,
) -> ImportResult<ChartKey> {
    let identifier = identifier_string(&score.identifier)?;
    let difficulty = score.difficulty.as_deref();

    match score.match_type.as_str() {
        "inGameID" => {
            let in_game_id = identifier
                .parse::<i64>()
                .map_err(|_| invalid(format!("Invalid inGameID '{}'.", identifier)))?;
            Ok(ChartKey::InGameId {
                in_game_id,
                difficulty: require_difficulty(game_type, difficulty, "inGameID")?,
                version: version.map(str::to_string),
            })
        }
        "sha256" => Ok(ChartKey::Sha256 { hash: identifier }),
        "md5" => Ok(ChartKey::Md5 { hash: identifier }),
        "title" => Ok(ChartKey::Title {
            title: identifier,
            difficulty: require_difficulty(game_type, difficulty, "title")?,
        }),
        other => Err(invalid(format!("Invalid matchType '{}'.", other))),
    }
}

pub async fn convert(
    data: &Value,
    context: &Value,
    resolver: &dyn ReferenceResolver,
    diag: &dyn DiagnosticSink,
) -> ImportResult<ConverterOutput> {
    let score: BatchManualScore = parse_input(data, "batch-manual score")?;
    let ctx: BatchManualContext = parse_input(context, "batch-manual context")?;
    let game_type = ctx.game_type;
    let config = game_type.config();

    for key in score.metrics.keys() {
        if config.provided_metric(key).is_none() {
            return Err(invalid(format!("Unknown field '{}' for {}.", key, game_type)));
        }
    }

    let mut builder = ScoreDataBuilder::new(game_type);
    for spec in config.provided_metrics {
        let value = score
            .metrics
            .get(spec.name)
            .ok_or_else(|| invalid(format!("Missing required field '{}'.", spec.name)))?;
        builder = builder.metric(spec.name, read_metric(spec, value, spec.name)?);
    }

    for (name, count) in &score.judgements {
        if !config.judgements.contains(&name.as_str()) {
            return Err(invalid(format!("Unknown judgement '{}' for {}.", name, game_type)));
        }
        if matches!(count, Some(c) if *c < 0) {
            return Err(invalid(format!("Invalid judgement count for '{}'.", name)));
        }
        builder = builder.judgement(name, *count);
    }

    for (name, value) in &score.optional {
        let spec = config
            .optional_metric(name)
            .ok_or_else(|| invalid(format!("Unknown optional metric '{}' for {}.", name, game_type)))?;
        if value.is_null() {
            continue;
        }
        let path = format!("optional.{}", name);
        builder = builder.optional(name, Some(read_metric(spec, value, &path)?));
    }

    let key = chart_key(game_type, &score, ctx.version.as_deref())?;
    let (chart, song) = resolve_references(
        ImportType::BatchManual,
        game_type,
        &key,
        data,
        context,
        resolver,
        diag,
    )
    .await?;

    let score_data = builder.build()?;
    check_chart_bounds(game_type, &score_data, &chart)?;

    let dry_score = DryScore {
        game_type,
        service: format!("{} (BATCH-MANUAL)", ctx.service),
        import_type: ImportType::BatchManual,
        time_achieved: score.time_achieved,
        comment: score.comment,
        score_data,
        score_meta: Value::Object(Map::new()),
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
    use crate::diagnostics::CaptureSink;
    use crate::resolver::InMemoryReferenceStore;
    use scorebridge_common::models::{ChartRef, SongRef};
    use scorebridge_common::Game;

    async fn store() -> InMemoryReferenceStore {
        let store = InMemoryReferenceStore::new();
        store
            .insert_song(SongRef {
                game: Game::Iidx,
                song_id: 1,
                title: "AA".into(),
                artist: "DJ Amuro".into(),
                data: Value::Null,
            })
            .await;
        store
            .insert_chart(
                ChartRef {
                    chart_id: "aa-spa".into(),
                    song_id: 1,
                    game_type: GameType::IidxSp,
                    difficulty: "ANOTHER".into(),
                    level: "12".into(),
                    level_num: 12.0,
                    note_count: Some(1834),
                    tierlist: Default::default(),
                    data: Value::Null,
                },
                &[
                    ChartKey::Title {
                        title: "AA".into(),
                        difficulty: "ANOTHER".into(),
                    },
                    ChartKey::InGameId {
                        in_game_id: 11016,
                        difficulty: "ANOTHER".into(),
                        version: None,
                    },
                ],
            )
            .await;
        store
    }

    fn ctx() -> Value {
        json!({"gameType": "iidx:SP", "service": "manual"})
    }

    fn item() -> Value {
        json!({
            "matchType": "title",
            "identifier": "AA",
            "difficulty": "ANOTHER",
            "score": 3000,
            "lamp": "HARD CLEAR",
            "timeAchieved": 1_600_000_000_000i64,
            "judgements": {"pgreat": 1300, "great": 400},
            "optional": {"bp": 20}
        })
    }

    #[test]
    fn test_parse_file_builds_context() {
        let (context, items) = parse_file(&json!({
            "meta": {"game": "iidx", "playtype": "SP", "service": "site"},
            "scores": [item(), item()]
        }))
        .unwrap();
        assert_eq!(context["gameType"], json!("iidx:SP"));
        assert_eq!(items.len(), 2);

        let bad = parse_file(&json!({
            "meta": {"game": "iidx", "playtype": "9B", "service": "site"},
            "scores": []
        }));
        assert!(matches!(bad, Err(ImportFailure::Converter(_))));
    }

    #[tokio::test]
    async fn test_converts_by_title() {
        let store = store().await;
        let out = convert(&item(), &ctx(), &store, &CaptureSink::new())
            .await
            .unwrap();

        assert_eq!(out.dry_score.service, "manual (BATCH-MANUAL)");
        let data = &out.dry_score.score_data;
        assert_eq!(data.integer("score").unwrap(), 3000);
        assert_eq!(data.enum_value("lamp").unwrap().index, 5);
        assert_eq!(data.optional_number("bp"), Some(20.0));
        assert_eq!(data.judgements["great"], Some(400));
    }

    #[tokio::test]
    async fn test_in_game_id_accepts_numbers_and_strings() {
        let store = store().await;
        for identifier in [json!(11016), json!("11016")] {
            let mut data = item();
            data["matchType"] = json!("inGameID");
            data["identifier"] = identifier;
            let out = convert(&data, &ctx(), &store, &CaptureSink::new()).await.unwrap();
            assert_eq!(out.chart.chart_id, "aa-spa");
        }
    }

    #[tokio::test]
    async fn test_user_errors_are_converter_failures() {
        let store = store().await;
        let sink = CaptureSink::new();

        let mut cases = Vec::new();

        let mut unknown_lamp = item();
        unknown_lamp["lamp"] = json!("SUPER CLEAR");
        cases.push(unknown_lamp);

        let mut missing = item();
        missing.as_object_mut().unwrap().remove("score");
        cases.push(missing);

        let mut wrong_type = item();
        wrong_type["score"] = json!("3000");
        cases.push(wrong_type);

        let mut negative = item();
        negative["score"] = json!(-1);
        cases.push(negative);

        let mut over_max = item();
        over_max["score"] = json!(1834 * 2 + 1);
        cases.push(over_max);

        let mut bad_match = item();
        bad_match["matchType"] = json!("songID");
        cases.push(bad_match);

        let mut bad_judgement = item();
        bad_judgement["judgements"] = json!({"perfect": 1});
        cases.push(bad_judgement);

        let mut bad_optional = item();
        bad_optional["optional"] = json!({"exScore": 1});
        cases.push(bad_optional);

        let mut stray = item();
        stray["percent"] = json!(50.0);
        cases.push(stray);

        for case in cases {
            let result = convert(&case, &ctx(), &store, &sink).await;
            assert!(
                matches!(result, Err(ImportFailure::Converter(_))),
                "{} should be rejected, got {:?}",
                case,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_chart_is_orphanable() {
        let store = store().await;
        let mut data = item();
        data["identifier"] = json!("Unknown Song");
        let result = convert(&data, &ctx(), &store, &CaptureSink::new()).await;
        assert!(matches!(result, Err(ImportFailure::ReferenceNotFound { .. })));
    }
}
