//! `ir/beatoraja`: BMS and PMS scores sent by the beatoraja/lr2oraja IR client

use super::score_utils::{
    check_chart_bounds, map_source, parse_input, resolve_references, ScoreDataBuilder,
};
use super::ConverterOutput;
use crate::diagnostics::DiagnosticSink;
use crate::error::{ImportFailure, ImportResult};
use crate::resolver::{ChartKey, ReferenceResolver};
use scorebridge_common::metrics::MetricValue;
use scorebridge_common::models::DryScore;
use scorebridge_common::{GameType, ImportType};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatorajaScore {
    pub sha256: String,
    /// BEAT_7K, BEAT_14K, POPN_9K, ...
    pub mode: String,
    #[serde(default)]
    pub device_type: Option<String>,
    pub exscore: i64,
    pub clear: String,
    /// Bad + poor; negative when unknown
    pub minbp: i64,
    pub maxcombo: i64,
    pub gauge: f64,
    pub epg: i64,
    pub lpg: i64,
    pub egr: i64,
    pub lgr: i64,
    pub egd: i64,
    pub lgd: i64,
    pub ebd: i64,
    pub lbd: i64,
    pub epr: i64,
    pub lpr: i64,
    pub ems: i64,
    pub lms: i64,
    #[serde(default)]
    pub random: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatorajaContext {
    /// "beatoraja" or "lr2oraja"
    pub client: String,
    pub time_received: i64,
}

const CLEARS: &[(&str, &str)] = &[
    ("NoPlay", "NO PLAY"),
    ("Failed", "FAILED"),
    ("AssistEasy", "ASSIST CLEAR"),
    ("LightAssistEasy", "ASSIST CLEAR"),
    ("Easy", "EASY CLEAR"),
    ("Normal", "CLEAR"),
    ("Hard", "HARD CLEAR"),
    ("ExHard", "EX HARD CLEAR"),
    ("FullCombo", "FULL COMBO"),
    ("Perfect", "FULL COMBO"),
    ("Max", "FULL COMBO"),
];

/// Play mode and device to game-type
fn game_type_for(mode: &str, device_type: Option<&str>) -> ImportResult<GameType> {
    match (mode, device_type) {
        ("BEAT_7K", _) => Ok(GameType::Bms7K),
        ("BEAT_14K", _) => Ok(GameType::Bms14K),
        ("POPN_9K", Some("KEYBOARD")) => Ok(GameType::PmsKeyboard),
        ("POPN_9K", _) => Ok(GameType::PmsController),
        (other, _) => Err(ImportFailure::Converter(format!(
            "Unsupported mode {}.",
            other
        ))),
    }
}

pub async fn convert(
    data: &Value,
    context: &Value,
    resolver: &dyn ReferenceResolver,
    diag: &dyn DiagnosticSink,
) -> ImportResult<ConverterOutput> {
    let score: BeatorajaScore = parse_input(data, "beatoraja score")?;
    let ctx: BeatorajaContext = parse_input(context, "beatoraja context")?;

    if score.clear == "NoPlay" {
        return Err(ImportFailure::Converter(
            "Refusing to import a score with a clear type of NoPlay.".to_string(),
        ));
    }

    let game_type = game_type_for(&score.mode, score.device_type.as_deref())?;
    let lamp = map_source(CLEARS, score.clear.as_str(), "beatoraja clear")?;

    let key = ChartKey::Sha256 {
        hash: score.sha256.clone(),
    };
    let (chart, song) = resolve_references(
        ImportType::Beatoraja,
        game_type,
        &key,
        data,
        context,
        resolver,
        diag,
    )
    .await?;

    let bp = (score.minbp >= 0).then_some(MetricValue::Integer(score.minbp));
    let gauge = (0.0..=100.0)
        .contains(&score.gauge)
        .then_some(MetricValue::Decimal(score.gauge));

    let score_data = ScoreDataBuilder::new(game_type)
        .integer("score", score.exscore)
        .label("lamp", lamp)?
        .judgement("pgreat", Some(score.epg + score.lpg))
        .judgement("great", Some(score.egr + score.lgr))
        .judgement("good", Some(score.egd + score.lgd))
        .judgement("bad", Some(score.ebd + score.lbd))
        .judgement("poor", Some(score.epr + score.lpr + score.ems + score.lms))
        .optional("bp", bp)
        .optional("maxCombo", Some(MetricValue::Integer(score.maxcombo)))
        .optional(
            "fast",
            Some(MetricValue::Integer(score.epg + score.egr + score.egd + score.ebd)),
        )
        .optional(
            "slow",
            Some(MetricValue::Integer(score.lpg + score.lgr + score.lgd + score.lbd)),
        )
        .optional("gauge", gauge)
        .build()?;

    check_chart_bounds(game_type, &score_data, &chart)?;

    let dry_score = DryScore {
        game_type,
        service: ctx.client.clone(),
        import_type: ImportType::Beatoraja,
        time_achieved: Some(ctx.time_received),
        comment: None,
        score_data,
        score_meta: json!({ "client": ctx.client, "random": score.random }),
    };

    Ok(ConverterOutput {
        dry_score,
        chart,
        song,
    })
}
