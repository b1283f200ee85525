//! Per-score rating formulas
//!
//! Every formula takes the fully derived score data and the chart. `None`
//! means the score has no rating (an ITG fail has no block rating), which is
//! different from a rating of 0.

use super::tierlist::{dp_tier_rating, tier_lamp_rating, KT_SP_TIERS, SIEGLINDE_TIERS};
use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::ChartRef;

/// Truncate to `places` decimals, ignoring float noise just under a step
fn floor_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    ((value * scale) + 1e-9).floor() / scale
}

fn coefficient(table: &[(&str, f64)], label: &str, what: &str) -> ImportResult<f64> {
    table
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, c)| *c)
        .ok_or_else(|| ImportFailure::Internal(format!("No {} coefficient for '{}'", what, label)))
}

/// First entry whose threshold the value reaches; tables are descending
fn step(table: &[(f64, f64)], value: f64) -> f64 {
    table
        .iter()
        .find(|(min, _)| value >= *min)
        .map_or(0.0, |(_, c)| *c)
}

pub fn kt_lamp_rating_sp(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    tier_lamp_rating(KT_SP_TIERS, data, chart).map(Some)
}

pub fn kt_lamp_rating_dp(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    dp_tier_rating(data, chart).map(Some)
}

pub fn sieglinde(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    tier_lamp_rating(SIEGLINDE_TIERS, data, chart).map(Some)
}

const VF6_GRADES: &[(&str, f64)] = &[
    ("PUC", 1.05),
    ("S", 1.05),
    ("AAA+", 1.02),
    ("AAA", 1.0),
    ("AA+", 0.97),
    ("AA", 0.94),
    ("A+", 0.91),
    ("A", 0.88),
    ("B", 0.85),
    ("C", 0.82),
    ("D", 0.8),
];

const VF6_LAMPS: &[(&str, f64)] = &[
    ("PERFECT ULTIMATE CHAIN", 1.1),
    ("ULTIMATE CHAIN", 1.05),
    ("EXCESSIVE CLEAR", 1.02),
    ("CLEAR", 1.0),
    ("FAILED", 0.5),
];

/// SOUND VOLTEX volforce contribution of one chart
pub fn vf6(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let score = data.number("score")?;
    let grade = coefficient(VF6_GRADES, &data.derived_enum("grade")?.label, "VF6 grade")?;
    let lamp = coefficient(VF6_LAMPS, &data.enum_value("lamp")?.label, "VF6 lamp")?;

    let raw = chart.level_num * (score / 10_000_000.0) * grade * lamp * 20.0;
    Ok(Some(floor_to(raw, 0) / 1000.0))
}

/// CHUNITHM play rating: chart constant adjusted by score band
pub fn chunithm_rating(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let score = data.number("score")?;
    let level = chart.level_num;

    let rating = if score >= 1_009_000.0 {
        level + 2.15
    } else if score >= 1_007_500.0 {
        level + 2.0 + (score - 1_007_500.0) / 10_000.0
    } else if score >= 1_005_000.0 {
        level + 1.5 + (score - 1_005_000.0) / 5_000.0
    } else if score >= 1_000_000.0 {
        level + 1.0 + (score - 1_000_000.0) / 10_000.0
    } else if score >= 975_000.0 {
        level + (score - 975_000.0) / 25_000.0
    } else if score >= 925_000.0 {
        level - 3.0 + (score - 925_000.0) * 3.0 / 50_000.0
    } else if score >= 900_000.0 {
        level - 5.0 + (score - 900_000.0) * 2.0 / 25_000.0
    } else if score >= 800_000.0 {
        (level - 5.0) / 2.0 + (score - 800_000.0) * ((level - 5.0) / 2.0) / 100_000.0
    } else if score >= 500_000.0 {
        ((level - 5.0) / 2.0) * (score - 500_000.0) / 300_000.0
    } else {
        0.0
    };

    Ok(Some(floor_to(rating.max(0.0), 2)))
}

const WACCA_RATE_STEPS: &[(f64, f64)] = &[
    (990_000.0, 4.0),
    (980_000.0, 3.75),
    (970_000.0, 3.5),
    (950_000.0, 3.25),
    (930_000.0, 3.0),
    (900_000.0, 2.75),
    (850_000.0, 2.5),
    (800_000.0, 2.0),
    (700_000.0, 1.5),
    (500_000.0, 1.0),
    (1.0, 0.5),
];

pub fn wacca_rate(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let score = data.number("score")?;
    Ok(Some(floor_to(chart.level_num * step(WACCA_RATE_STEPS, score), 2)))
}

/// jubeat jubility; a music rate under 50 earns nothing
pub fn jubility(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let music_rate = data.number("musicRate")?;
    if music_rate < 50.0 {
        return Ok(Some(0.0));
    }
    Ok(Some(floor_to(chart.level_num * 12.5 * (music_rate / 99.0), 1)))
}

pub fn gitadora_skill(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let percent = data.number("percent")?;
    Ok(Some(floor_to(chart.level_num * (percent / 100.0) * 20.0, 2)))
}

/// The chart's block level, if the run passed
pub fn itg_block_rating(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    if data.enum_value("lamp")?.label == "FAILED" {
        return Ok(None);
    }
    Ok(Some(chart.level_num))
}

const MAIMAIDX_RANK_STEPS: &[(f64, f64)] = &[
    (100.5, 22.4),
    (100.0, 21.6),
    (99.5, 21.1),
    (99.0, 20.8),
    (98.0, 20.3),
    (97.0, 20.0),
    (94.0, 16.8),
    (90.0, 15.2),
    (80.0, 13.6),
    (75.0, 12.0),
    (70.0, 11.2),
    (60.0, 9.6),
    (50.0, 8.0),
];

pub fn maimaidx_rate(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let percent = data.number("percent")?.min(100.5);
    let coef = step(MAIMAIDX_RANK_STEPS, percent);
    Ok(Some(floor_to(chart.level_num * (percent / 100.0) * coef, 0)))
}

pub fn museca_curator_skill(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let score = data.number("score")?;
    let bonus = match data.enum_value("lamp")?.label.as_str() {
        "CONNECT ALL" | "PERFECT CONNECT ALL" => 1.25,
        _ => 1.0,
    };
    Ok(Some(floor_to(chart.level_num * (score / 1_000_000.0) * bonus, 2)))
}

const POPN_LAMP_BONUS: &[(&str, f64)] = &[
    ("FAILED", -5000.0),
    ("EASY CLEAR", 0.0),
    ("CLEAR", 0.0),
    ("FULL COMBO", 3000.0),
    ("PERFECT", 3000.0),
];

pub fn popn_class_points(data: &ScoreData, chart: &ChartRef) -> ImportResult<Option<f64>> {
    let score = data.number("score")?;
    let bonus = coefficient(POPN_LAMP_BONUS, &data.derived_enum("lamp")?.label, "pop'n lamp")?;
    let points = (10_000.0 * chart.level_num + score - 50_000.0 + bonus) / 5440.0;
    Ok(Some(floor_to(points.max(0.0), 2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebridge_common::metrics::{EnumValue, MetricValue};
    use scorebridge_common::GameType;
    use serde_json::Value;

    fn chart(level: f64) -> ChartRef {
        ChartRef {
            chart_id: "c".into(),
            song_id: 1,
            game_type: GameType::SdvxSingle,
            difficulty: "X".into(),
            level: level.to_string(),
            level_num: level,
            note_count: None,
            tierlist: Default::default(),
            data: Value::Null,
        }
    }

    fn data(metrics: &[(&str, MetricValue)], derived: &[(&str, MetricValue)]) -> ScoreData {
        let mut d = ScoreData::default();
        for (k, v) in metrics {
            d.metrics.insert(k.to_string(), v.clone());
        }
        for (k, v) in derived {
            d.derived.insert(k.to_string(), v.clone());
        }
        d
    }

    #[test]
    fn test_vf6_perfect_score() {
        let d = data(
            &[
                ("score", MetricValue::Integer(10_000_000)),
                ("lamp", EnumValue::new("PERFECT ULTIMATE CHAIN", 4).into()),
            ],
            &[("grade", EnumValue::new("PUC", 10).into())],
        );
        assert_eq!(vf6(&d, &chart(20.0)).unwrap(), Some(0.462));
    }

    #[test]
    fn test_chunithm_top_band() {
        let d = data(&[("score", MetricValue::Integer(1_009_000))], &[]);
        assert_eq!(chunithm_rating(&d, &chart(14.0)).unwrap(), Some(16.15));

        let d = data(&[("score", MetricValue::Integer(400_000))], &[]);
        assert_eq!(chunithm_rating(&d, &chart(14.0)).unwrap(), Some(0.0));
    }

    #[test]
    fn test_itg_fail_has_no_block() {
        let d = data(&[("lamp", EnumValue::new("FAILED", 0).into())], &[]);
        assert_eq!(itg_block_rating(&d, &chart(18.0)).unwrap(), None);

        let d = data(&[("lamp", EnumValue::new("CLEAR", 1).into())], &[]);
        assert_eq!(itg_block_rating(&d, &chart(18.0)).unwrap(), Some(18.0));
    }

    #[test]
    fn test_percent_based_rates() {
        let d = data(&[("percent", MetricValue::Decimal(101.0))], &[]);
        assert_eq!(maimaidx_rate(&d, &chart(14.0)).unwrap(), Some(315.0));

        let d = data(&[("percent", MetricValue::Decimal(100.0))], &[]);
        assert_eq!(gitadora_skill(&d, &chart(9.0)).unwrap(), Some(180.0));
    }

    #[test]
    fn test_wacca_and_jubility_floors() {
        let d = data(&[("score", MetricValue::Integer(995_000))], &[]);
        assert_eq!(wacca_rate(&d, &chart(13.0)).unwrap(), Some(52.0));

        let d = data(&[("musicRate", MetricValue::Decimal(40.0))], &[]);
        assert_eq!(jubility(&d, &chart(10.0)).unwrap(), Some(0.0));
    }

    #[test]
    fn test_unknown_grade_coefficient_is_internal() {
        let d = data(
            &[
                ("score", MetricValue::Integer(1)),
                ("lamp", EnumValue::new("CLEAR", 1).into()),
            ],
            &[("grade", EnumValue::new("Z", 0).into())],
        );
        assert!(matches!(vf6(&d, &chart(1.0)), Err(ImportFailure::Internal(_))));
    }
}
