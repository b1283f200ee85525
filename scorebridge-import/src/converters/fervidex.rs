//! `ir/fervidex`: beatmania IIDX scores from the fervidex hook

use super::score_utils::{
    check_chart_bounds, map_source, parse_input, resolve_references, ScoreDataBuilder,
};
use super::ConverterOutput;
use crate::diagnostics::DiagnosticSink;
use crate::error::ImportResult;
use crate::resolver::{ChartKey, ReferenceResolver};
use scorebridge_common::metrics::MetricValue;
use scorebridge_common::models::DryScore;
use scorebridge_common::{GameType, ImportType};
use serde::Deserialize;
use serde_json::{json, Value};

pub const SERVICE: &str = "Fervidex";

#[derive(Debug, Deserialize)]
pub struct FervidexDead {
    pub measure: Option<i64>,
    pub note: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FervidexScore {
    /// spb, spn, sph, spa, spl, dpn, dph, dpa, dpl
    pub chart: String,
    pub entry_id: i64,
    pub ex_score: i64,
    pub clear_type: i64,
    pub pgreat: i64,
    pub great: i64,
    pub good: i64,
    pub bad: i64,
    pub poor: i64,
    #[serde(default)]
    pub fast: Option<i64>,
    #[serde(default)]
    pub slow: Option<i64>,
    #[serde(default)]
    pub max_combo: Option<i64>,
    /// Gauge history; the last entry is the final gauge
    #[serde(default)]
    pub gauge: Vec<i64>,
    #[serde(default)]
    pub dead: Option<FervidexDead>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FervidexContext {
    /// Game version the chart set belongs to ("27", "28", ...)
    pub version: String,
    pub time_received: i64,
}

const CHARTS: &[(&str, (GameType, &str))] = &[
    ("spb", (GameType::IidxSp, "BEGINNER")),
    ("spn", (GameType::IidxSp, "NORMAL")),
    ("sph", (GameType::IidxSp, "HYPER")),
    ("spa", (GameType::IidxSp, "ANOTHER")),
    ("spl", (GameType::IidxSp, "LEGGENDARIA")),
    ("dpn", (GameType::IidxDp, "NORMAL")),
    ("dph", (GameType::IidxDp, "HYPER")),
    ("dpa", (GameType::IidxDp, "ANOTHER")),
    ("dpl", (GameType::IidxDp, "LEGGENDARIA")),
];

const CLEAR_TYPES: &[(i64, &str)] = &[
    (0, "NO PLAY"),
    (1, "FAILED"),
    (2, "ASSIST CLEAR"),
    (3, "EASY CLEAR"),
    (4, "CLEAR"),
    (5, "HARD CLEAR"),
    (6, "EX HARD CLEAR"),
    (7, "FULL COMBO"),
];

pub async fn convert(
    data: &Value,
    context: &Value,
    resolver: &dyn ReferenceResolver,
    diag: &dyn DiagnosticSink,
) -> ImportResult<ConverterOutput> {
    let score: FervidexScore = parse_input(data, "fervidex score")?;
    let ctx: FervidexContext = parse_input(context, "fervidex context")?;

    let (game_type, difficulty) = map_source(CHARTS, score.chart.as_str(), "fervidex chart")?;
    let lamp = map_source(CLEAR_TYPES, score.clear_type, "fervidex clear_type")?;

    let key = ChartKey::InGameId {
        in_game_id: score.entry_id,
        difficulty: difficulty.to_string(),
        version: Some(ctx.version.clone()),
    };
    let (chart, song) = resolve_references(
        ImportType::Fervidex,
        game_type,
        &key,
        data,
        context,
        resolver,
        diag,
    )
    .await?;

    // a dead player's bad/poor count stops at the death point
    let bp = match score.dead {
        Some(_) => None,
        None => Some(MetricValue::Integer(score.bad + score.poor)),
    };

    let score_data = ScoreDataBuilder::new(game_type)
        .integer("score", score.ex_score)
        .label("lamp", lamp)?
        .judgement("pgreat", Some(score.pgreat))
        .judgement("great", Some(score.great))
        .judgement("good", Some(score.good))
        .judgement("bad", Some(score.bad))
        .judgement("poor", Some(score.poor))
        .optional("bp", bp)
        .optional("fast", score.fast.map(MetricValue::Integer))
        .optional("slow", score.slow.map(MetricValue::Integer))
        .optional("maxCombo", score.max_combo.map(MetricValue::Integer))
        .optional(
            "gauge",
            score
                .gauge
                .last()
                .map(|g| MetricValue::Decimal((*g).clamp(0, 100) as f64)),
        )
        .build()?;

    check_chart_bounds(game_type, &score_data, &chart)?;

    let score_meta = match &score.dead {
        Some(dead) => json!({ "version": ctx.version, "deadMeasure": dead.measure, "deadNote": dead.note }),
        None => json!({ "version": ctx.version }),
    };

    let dry_score = DryScore {
        game_type,
        service: SERVICE.to_string(),
        import_type: ImportType::Fervidex,
        time_achieved: Some(ctx.time_received),
        comment: None,
        score_data,
        score_meta,
    };

    Ok(ConverterOutput {
        dry_score,
        chart,
        song,
    })
}
