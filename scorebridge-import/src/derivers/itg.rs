//! ITG stamina: a failed run is ranked by how far the player survived

use super::{grade as grade_of, Derived};
use crate::error::ImportResult;
use scorebridge_common::game::tables::ITG_GBOUNDARIES;
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::ChartRef;

fn failed(data: &ScoreData) -> ImportResult<bool> {
    Ok(data.enum_value("lamp")?.label == "FAILED")
}

/// Failed → survivedPercent (0-100), passed → 100 + scorePercent (100-200)
pub fn final_percent(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    if failed(data)? {
        return Ok(Derived::Number(data.number("survivedPercent")?));
    }
    Ok(Derived::Number(100.0 + data.number("scorePercent")?))
}

pub fn grade(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    if failed(data)? {
        return Ok(Derived::Label("F"));
    }
    grade_of(ITG_GBOUNDARIES, data.number("scorePercent")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivers::tests::{chart, data};
    use scorebridge_common::metrics::{EnumValue, MetricValue};
    use scorebridge_common::GameType;

    fn run(lamp: &str, index: usize, score: f64, survived: f64) -> ScoreData {
        data(&[
            ("lamp", EnumValue::new(lamp, index).into()),
            ("scorePercent", MetricValue::Decimal(score)),
            ("survivedPercent", MetricValue::Decimal(survived)),
        ])
    }

    #[test]
    fn test_failed_uses_survived_even_at_100() {
        let c = chart(GameType::ItgStamina, None);
        let d = run("FAILED", 0, 91.0, 100.0);
        assert_eq!(final_percent(&d, &c).unwrap(), Derived::Number(100.0));
        assert_eq!(grade(&d, &c).unwrap(), Derived::Label("F"));

        let d = run("FAILED", 0, 12.0, 43.5);
        assert_eq!(final_percent(&d, &c).unwrap(), Derived::Number(43.5));
    }

    #[test]
    fn test_cleared_adds_hundred() {
        let c = chart(GameType::ItgStamina, None);
        let d = run("CLEAR", 1, 96.5, 100.0);
        assert_eq!(final_percent(&d, &c).unwrap(), Derived::Number(196.5));
        assert_eq!(grade(&d, &c).unwrap(), Derived::Label("★"));
    }
}
