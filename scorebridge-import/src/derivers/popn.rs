//! pop'n music: lamp and grade both depend on the clear medal

use super::{grade as grade_of, Derived};
use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::game::tables::POPN_GBOUNDARIES;
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::ChartRef;

const MEDAL_LAMPS: &[(&str, &str)] = &[
    ("failedCircle", "FAILED"),
    ("failedDiamond", "FAILED"),
    ("failedStar", "FAILED"),
    ("easyClear", "EASY CLEAR"),
    ("clearCircle", "CLEAR"),
    ("clearDiamond", "CLEAR"),
    ("clearStar", "CLEAR"),
    ("fullComboCircle", "FULL COMBO"),
    ("fullComboDiamond", "FULL COMBO"),
    ("fullComboStar", "FULL COMBO"),
    ("perfect", "PERFECT"),
];

/// Failing scores cannot be graded above A
const FAILED_GRADE_CAP: f64 = 90_000.0;

fn medal_lamp(data: &ScoreData) -> ImportResult<&'static str> {
    let medal = data.enum_value("clearMedal")?.label.as_str();
    MEDAL_LAMPS
        .iter()
        .find(|(m, _)| *m == medal)
        .map(|(_, lamp)| *lamp)
        .ok_or_else(|| ImportFailure::Internal(format!("Unmapped clear medal '{}'", medal)))
}

pub fn lamp(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    Ok(Derived::Label(medal_lamp(data)?))
}

pub fn grade(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    let score = data.number("score")?;
    if medal_lamp(data)? == "FAILED" && score >= FAILED_GRADE_CAP {
        return Ok(Derived::Label("A"));
    }
    grade_of(POPN_GBOUNDARIES, score)
}
