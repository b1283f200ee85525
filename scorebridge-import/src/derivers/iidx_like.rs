//! EX-score based metrics shared by iidx, bms and pms

use super::{grade as grade_of, Derived};
use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::game::tables::IIDX_GBOUNDARIES;
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::ChartRef;

fn ex_percent(data: &ScoreData, chart: &ChartRef) -> ImportResult<f64> {
    let notes = chart.note_count.filter(|n| *n > 0).ok_or_else(|| {
        ImportFailure::Internal(format!("Chart {} has no note count.", chart.chart_id))
    })?;
    let score = data.integer("score")?;
    Ok(100.0 * score as f64 / (f64::from(notes) * 2.0))
}

pub fn percent(data: &ScoreData, chart: &ChartRef) -> ImportResult<Derived> {
    Ok(Derived::Number(ex_percent(data, chart)?))
}

pub fn grade(data: &ScoreData, chart: &ChartRef) -> ImportResult<Derived> {
    grade_of(IIDX_GBOUNDARIES, ex_percent(data, chart)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivers::tests::{chart, data};
    use scorebridge_common::metrics::MetricValue;
    use scorebridge_common::GameType;

    #[test]
    fn test_max_and_boundaries() {
        let c = chart(GameType::IidxSp, Some(1000));
        let at = |score| data(&[("score", MetricValue::Integer(score))]);

        assert_eq!(grade(&at(2000), &c).unwrap(), Derived::Label("MAX"));
        assert_eq!(grade(&at(1999), &c).unwrap(), Derived::Label("MAX-"));
        assert_eq!(grade(&at(0), &c).unwrap(), Derived::Label("F"));
        assert_eq!(percent(&at(1500), &c).unwrap(), Derived::Number(75.0));
    }

    #[test]
    fn test_zero_notes_is_internal() {
        let c = chart(GameType::IidxSp, Some(0));
        let d = data(&[("score", MetricValue::Integer(0))]);
        assert!(matches!(percent(&d, &c), Err(ImportFailure::Internal(_))));
    }
}
