//! Lamp ratings read from chart tier lists
//!
//! A tier list gives a chart one difficulty value per clear type ("how hard is
//! it to HARD CLEAR this"). A score is worth the best tier its lamp reaches.

use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::game::tables::IIDX_LAMPS;
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::ChartRef;

/// A tier-list key and the lamp needed to earn it
#[derive(Debug, Clone, Copy)]
pub struct TierClear {
    pub tier: &'static str,
    pub lamp: &'static str,
}

const fn tier(tier: &'static str, lamp: &'static str) -> TierClear {
    TierClear { tier, lamp }
}

pub const KT_SP_TIERS: &[TierClear] = &[
    tier("kt-NC", "CLEAR"),
    tier("kt-HC", "HARD CLEAR"),
    tier("kt-EXHC", "EX HARD CLEAR"),
];

pub const SIEGLINDE_TIERS: &[TierClear] = &[tier("sgl-EC", "EASY CLEAR"), tier("sgl-HC", "HARD CLEAR")];

pub const DP_TIER: &str = "dp-tier";

fn lamp_index(label: &str) -> ImportResult<usize> {
    IIDX_LAMPS
        .iter()
        .position(|l| *l == label)
        .ok_or_else(|| ImportFailure::Internal(format!("Tier lamp '{}' is not a known lamp", label)))
}

/// Best tier value the score's lamp qualifies for
///
/// - lamp below every tiered clear type → 0
/// - chart has none of the tier keys → the chart's numeric level
/// - otherwise the largest non-null tier whose clear type was reached, or 0
pub fn tier_lamp_rating(tiers: &[TierClear], data: &ScoreData, chart: &ChartRef) -> ImportResult<f64> {
    let achieved = data.enum_value("lamp")?.index;

    let mut lowest = usize::MAX;
    let mut best: Option<f64> = None;
    let mut any_tier = false;

    for t in tiers {
        let needed = lamp_index(t.lamp)?;
        lowest = lowest.min(needed);

        if chart.tierlist.contains_key(t.tier) {
            any_tier = true;
        }
        if needed <= achieved {
            if let Some(value) = chart.tier_value(t.tier) {
                best = Some(best.map_or(value, |b| b.max(value)));
            }
        }
    }

    if achieved < lowest {
        return Ok(0.0);
    }
    if !any_tier {
        return Ok(chart.level_num);
    }
    Ok(best.unwrap_or(0.0))
}

/// DP has a single tier, earned by any clear
pub fn dp_tier_rating(data: &ScoreData, chart: &ChartRef) -> ImportResult<f64> {
    let achieved = data.enum_value("lamp")?.index;
    if achieved < lamp_index("CLEAR")? {
        return Ok(0.0);
    }
    Ok(chart.tier_value(DP_TIER).unwrap_or(chart.level_num))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebridge_common::metrics::EnumValue;
    use scorebridge_common::models::TierlistValue;
    use scorebridge_common::GameType;
    use serde_json::Value;

    fn chart(tiers: &[(&str, Option<f64>)]) -> ChartRef {
        ChartRef {
            chart_id: "5.1.1.-spa".into(),
            song_id: 1,
            game_type: GameType::IidxSp,
            difficulty: "ANOTHER".into(),
            level: "10".into(),
            level_num: 10.0,
            note_count: Some(786),
            tierlist: tiers
                .iter()
                .map(|(k, v)| {
                    (
                        k.to_string(),
                        TierlistValue {
                            value: *v,
                            text: None,
                        },
                    )
                })
                .collect(),
            data: Value::Null,
        }
    }

    fn lamp(label: &str) -> ScoreData {
        let mut data = ScoreData::default();
        let index = lamp_index(label).unwrap();
        data.metrics
            .insert("lamp".into(), EnumValue::new(label, index).into());
        data
    }

    fn sp(nc: Option<f64>, hc: Option<f64>, exhc: Option<f64>) -> ChartRef {
        let mut tiers = Vec::new();
        if let Some(v) = nc {
            tiers.push(("kt-NC", Some(v)));
        }
        if let Some(v) = hc {
            tiers.push(("kt-HC", Some(v)));
        }
        if let Some(v) = exhc {
            tiers.push(("kt-EXHC", Some(v)));
        }
        chart(&tiers)
    }

    fn rate(l: &str, c: &ChartRef) -> f64 {
        tier_lamp_rating(KT_SP_TIERS, &lamp(l), c).unwrap()
    }

    #[test]
    fn test_each_lamp_earns_its_tier() {
        let c = sp(Some(10.5), Some(10.6), Some(10.7));
        assert_eq!(rate("CLEAR", &c), 10.5);
        assert_eq!(rate("HARD CLEAR", &c), 10.6);
        assert_eq!(rate("EX HARD CLEAR", &c), 10.7);
        assert_eq!(rate("FULL COMBO", &c), 10.7);
    }

    #[test]
    fn test_missing_tiers_are_worth_nothing() {
        assert_eq!(rate("CLEAR", &sp(None, Some(10.6), Some(10.7))), 0.0);
        assert_eq!(rate("HARD CLEAR", &sp(None, None, Some(10.7))), 0.0);
        assert_eq!(rate("HARD CLEAR", &sp(Some(10.5), None, Some(10.7))), 10.5);
    }

    #[test]
    fn test_easier_tier_can_be_worth_more() {
        assert_eq!(rate("HARD CLEAR", &sp(Some(10.9), Some(10.5), Some(10.7))), 10.9);
        assert_eq!(rate("EX HARD CLEAR", &sp(Some(10.9), Some(10.5), Some(10.7))), 10.9);
        assert_eq!(rate("EX HARD CLEAR", &sp(Some(10.4), Some(10.9), Some(10.7))), 10.9);
    }

    #[test]
    fn test_untiered_chart_uses_level() {
        let c = sp(None, None, None);
        assert_eq!(rate("CLEAR", &c), 10.0);
        assert_eq!(rate("EASY CLEAR", &c), 0.0);
        assert_eq!(rate("FAILED", &sp(Some(10.5), None, None)), 0.0);
    }

    #[test]
    fn test_null_tier_value_counts_as_tier_data() {
        let c = chart(&[("kt-NC", None)]);
        assert_eq!(rate("CLEAR", &c), 0.0);
    }

    #[test]
    fn test_dp_tier() {
        assert_eq!(dp_tier_rating(&lamp("CLEAR"), &chart(&[(DP_TIER, Some(10.4))])).unwrap(), 10.4);
        assert_eq!(dp_tier_rating(&lamp("FAILED"), &chart(&[(DP_TIER, Some(10.4))])).unwrap(), 0.0);
        assert_eq!(dp_tier_rating(&lamp("CLEAR"), &chart(&[(DP_TIER, None)])).unwrap(), 10.0);
        assert_eq!(dp_tier_rating(&lamp("FAILED"), &chart(&[(DP_TIER, None)])).unwrap(), 0.0);
    }

    #[test]
    fn test_sieglinde_tiers() {
        let c = chart(&[("sgl-EC", Some(12.1)), ("sgl-HC", Some(13.4))]);
        assert_eq!(tier_lamp_rating(SIEGLINDE_TIERS, &lamp("EASY CLEAR"), &c).unwrap(), 12.1);
        assert_eq!(tier_lamp_rating(SIEGLINDE_TIERS, &lamp("CLEAR"), &c).unwrap(), 12.1);
        assert_eq!(tier_lamp_rating(SIEGLINDE_TIERS, &lamp("FULL COMBO"), &c).unwrap(), 13.4);
        assert_eq!(tier_lamp_rating(SIEGLINDE_TIERS, &lamp("ASSIST CLEAR"), &c).unwrap(), 0.0);
    }
}
