//! Rating and class calculator registry
//!
//! Per game-type: score ratings computed from one score and its chart,
//! session ratings aggregated over the scores of one import, profile ratings
//! aggregated over a user's personal bests, and classes read off profile
//! ratings. Names must match the game-type configuration.

pub mod aggregate;
pub mod classes;
pub mod formulas;
pub mod tierlist;

pub use aggregate::Aggregate;
pub use classes::ClassDeriver;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::metrics::{EnumValue, ScoreData};
use scorebridge_common::models::ChartRef;
use scorebridge_common::GameType;
use std::collections::BTreeMap;

pub type Ratings = BTreeMap<String, Option<f64>>;

pub type ScoreCalcFn = fn(&ScoreData, &ChartRef) -> ImportResult<Option<f64>>;

#[derive(Clone, Copy)]
pub struct ScoreCalc {
    pub name: &'static str,
    pub calc: ScoreCalcFn,
}

/// Aggregated rating `name` built from the score rating `source`
#[derive(Debug, Clone, Copy)]
pub struct RatingAggregate {
    pub name: &'static str,
    pub source: &'static str,
    pub aggregate: Aggregate,
}

pub struct CalculatorSet {
    pub score: &'static [ScoreCalc],
    pub session: &'static [RatingAggregate],
    pub profile: &'static [RatingAggregate],
    pub classes: &'static [ClassDeriver],
}

const fn agg(name: &'static str, source: &'static str, aggregate: Aggregate) -> RatingAggregate {
    RatingAggregate {
        name,
        source,
        aggregate,
    }
}

const SESSION_BEST: Aggregate = Aggregate::MeanOfBest(10);

static IIDX_SP: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "ktLampRating",
        calc: formulas::kt_lamp_rating_sp,
    }],
    session: &[agg("ktLampRating", "ktLampRating", SESSION_BEST)],
    profile: &[agg("ktLampRating", "ktLampRating", Aggregate::MeanOfBest(20))],
    classes: &[],
};

static IIDX_DP: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "ktLampRating",
        calc: formulas::kt_lamp_rating_dp,
    }],
    session: &[agg("ktLampRating", "ktLampRating", SESSION_BEST)],
    profile: &[agg("ktLampRating", "ktLampRating", Aggregate::MeanOfBest(20))],
    classes: &[],
};

static BMS_PMS: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "sieglinde",
        calc: formulas::sieglinde,
    }],
    session: &[agg("sieglinde", "sieglinde", SESSION_BEST)],
    profile: &[agg("sieglinde", "sieglinde", Aggregate::MeanOfBest(20))],
    classes: &[],
};

const VF6: &[ScoreCalc] = &[ScoreCalc {
    name: "VF6",
    calc: formulas::vf6,
}];

static SDVX: CalculatorSet = CalculatorSet {
    score: VF6,
    session: &[agg("VF6", "VF6", SESSION_BEST)],
    profile: &[agg("VF6", "VF6", Aggregate::SumOfBest(50))],
    classes: &[classes::SDVX_VF_CLASS],
};

static USC: CalculatorSet = CalculatorSet {
    score: VF6,
    session: &[agg("VF6", "VF6", SESSION_BEST)],
    profile: &[agg("VF6", "VF6", Aggregate::SumOfBest(50))],
    classes: &[],
};

static CHUNITHM: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "rating",
        calc: formulas::chunithm_rating,
    }],
    session: &[agg("naiveRating", "rating", SESSION_BEST)],
    profile: &[agg("naiveRating", "rating", Aggregate::MeanOfBest(20))],
    classes: &[classes::CHUNITHM_COLOUR],
};

static WACCA: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "rate",
        calc: formulas::wacca_rate,
    }],
    session: &[agg("naiveRate", "rate", SESSION_BEST)],
    profile: &[agg("naiveRate", "rate", Aggregate::SumOfBest(50))],
    classes: &[classes::WACCA_COLOUR],
};

static JUBEAT: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "jubility",
        calc: formulas::jubility,
    }],
    session: &[agg("jubility", "jubility", SESSION_BEST)],
    profile: &[agg("jubility", "jubility", Aggregate::SumOfBest(30))],
    classes: &[classes::JUBEAT_COLOUR],
};

static GITADORA: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "skill",
        calc: formulas::gitadora_skill,
    }],
    session: &[agg("skill", "skill", SESSION_BEST)],
    profile: &[agg("naiveSkill", "skill", Aggregate::SumOfBest(50))],
    classes: &[classes::GITADORA_COLOUR],
};

static ITG: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "blockRating",
        calc: formulas::itg_block_rating,
    }],
    session: &[agg("blockRating", "blockRating", Aggregate::Max)],
    profile: &[agg("highestBlock", "blockRating", Aggregate::Max)],
    classes: &[],
};

static MAIMAIDX: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "rate",
        calc: formulas::maimaidx_rate,
    }],
    session: &[agg("naiveRate", "rate", SESSION_BEST)],
    profile: &[agg("naiveRate", "rate", Aggregate::SumOfBest(50))],
    classes: &[classes::MAIMAIDX_COLOUR],
};

static MUSECA: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "curatorSkill",
        calc: formulas::museca_curator_skill,
    }],
    session: &[agg("curatorSkill", "curatorSkill", SESSION_BEST)],
    profile: &[agg("curatorSkill", "curatorSkill", Aggregate::SumOfBest(20))],
    classes: &[],
};

static POPN: CalculatorSet = CalculatorSet {
    score: &[ScoreCalc {
        name: "classPoints",
        calc: formulas::popn_class_points,
    }],
    session: &[agg("classPoints", "classPoints", SESSION_BEST)],
    profile: &[agg("naiveClassPoints", "classPoints", Aggregate::MeanOfBest(20))],
    classes: &[classes::POPN_CLASS],
};

pub fn calculators_for(game_type: GameType) -> &'static CalculatorSet {
    match game_type {
        GameType::IidxSp => &IIDX_SP,
        GameType::IidxDp => &IIDX_DP,
        GameType::Bms7K | GameType::Bms14K | GameType::PmsController | GameType::PmsKeyboard => {
            &BMS_PMS
        }
        GameType::SdvxSingle => &SDVX,
        GameType::UscController | GameType::UscKeyboard => &USC,
        GameType::ChunithmSingle => &CHUNITHM,
        GameType::WaccaSingle => &WACCA,
        GameType::JubeatSingle => &JUBEAT,
        GameType::GitadoraGita | GameType::GitadoraDora => &GITADORA,
        GameType::ItgStamina => &ITG,
        GameType::MaimaidxSingle => &MAIMAIDX,
        GameType::MusecaSingle => &MUSECA,
        GameType::Popn9B => &POPN,
    }
}

fn same_names<'a>(registered: impl Iterator<Item = &'a str>, declared: &[&str]) -> bool {
    let registered: Vec<&str> = registered.collect();
    registered.len() == declared.len() && declared.iter().all(|d| registered.contains(d))
}

/// Check that the registry and the configuration name the same ratings
pub fn check_registry(game_type: GameType) -> ImportResult<()> {
    let config = game_type.config();
    let set = calculators_for(game_type);

    let checks = [
        ("score", same_names(set.score.iter().map(|c| c.name), config.score_ratings)),
        ("session", same_names(set.session.iter().map(|c| c.name), config.session_ratings)),
        ("profile", same_names(set.profile.iter().map(|c| c.name), config.profile_ratings)),
        (
            "class",
            same_names(
                set.classes.iter().map(|c| c.name),
                &config.classes.iter().map(|c| c.name).collect::<Vec<_>>(),
            ),
        ),
    ];

    match checks.iter().find(|(_, ok)| !ok) {
        Some((what, _)) => Err(ImportFailure::Internal(format!(
            "{} {} calculators do not match the configuration.",
            game_type, what
        ))),
        None => Ok(()),
    }
}

/// Per-score ratings for one fully derived score
pub fn calculate_score(
    game_type: GameType,
    data: &ScoreData,
    chart: &ChartRef,
    diag: &dyn DiagnosticSink,
) -> ImportResult<Ratings> {
    if let Err(e) = check_registry(game_type) {
        diag.emit(Diagnostic::new(Severity::Debug, e.to_string()).with("game_type", game_type));
        return Err(e);
    }

    let mut ratings = Ratings::new();
    for c in calculators_for(game_type).score {
        let value = (c.calc)(data, chart)?;
        ratings.insert(c.name.to_string(), value.filter(|v| v.is_finite()));
    }
    Ok(ratings)
}

fn aggregate_all<'a>(
    aggregates: &[RatingAggregate],
    rated: impl Iterator<Item = &'a Ratings> + Clone,
) -> Ratings {
    aggregates
        .iter()
        .map(|a| {
            let values = rated
                .clone()
                .filter_map(|r| r.get(a.source).copied().flatten());
            (a.name.to_string(), a.aggregate.apply(values))
        })
        .collect()
}

/// Session ratings over the score ratings of one import
pub fn calculate_session<'a>(
    game_type: GameType,
    scores: impl Iterator<Item = &'a Ratings> + Clone,
) -> Ratings {
    aggregate_all(calculators_for(game_type).session, scores)
}

/// Profile ratings over the ratings of a user's personal bests
pub fn calculate_profile<'a>(
    game_type: GameType,
    pbs: impl Iterator<Item = &'a Ratings> + Clone,
) -> Ratings {
    aggregate_all(calculators_for(game_type).profile, pbs)
}

/// Classes read off profile ratings
pub fn derive_classes(
    game_type: GameType,
    profile: &Ratings,
) -> ImportResult<BTreeMap<String, EnumValue>> {
    let config = game_type.config();
    let mut out = BTreeMap::new();
    for c in calculators_for(game_type).classes {
        if let Some(label) = c.derive(profile) {
            out.insert(c.name.to_string(), config.class_value(c.name, label)?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CaptureSink;
    use scorebridge_common::metrics::MetricValue;
    use serde_json::Value;

    #[test]
    fn test_every_game_type_matches_configuration() {
        for gt in GameType::ALL {
            check_registry(gt).unwrap();
        }
    }

    #[test]
    fn test_every_class_label_is_configured() {
        for gt in GameType::ALL {
            let config = gt.config();
            for c in calculators_for(gt).classes {
                for (_, label) in c.thresholds {
                    config.class_value(c.name, label).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_session_and_profile_use_source_rating() {
        let scores: Vec<Ratings> = [12.0, 14.0, 16.0]
            .iter()
            .map(|v| Ratings::from([("rating".to_string(), Some(*v))]))
            .collect();

        let session = calculate_session(GameType::ChunithmSingle, scores.iter());
        assert_eq!(session["naiveRating"], Some(14.0));

        let profile = calculate_profile(GameType::ChunithmSingle, scores.iter());
        let classes = derive_classes(GameType::ChunithmSingle, &profile).unwrap();
        assert_eq!(classes["colour"].label, "GOLD");
    }

    #[test]
    fn test_no_scores_means_no_rating_or_class() {
        let profile = calculate_profile(GameType::Popn9B, std::iter::empty());
        assert_eq!(profile["naiveClassPoints"], None);
        assert!(derive_classes(GameType::Popn9B, &profile).unwrap().is_empty());
    }

    #[test]
    fn test_itg_session_is_highest_passed_block() {
        let scores = vec![
            Ratings::from([("blockRating".to_string(), Some(15.0))]),
            Ratings::from([("blockRating".to_string(), None)]),
            Ratings::from([("blockRating".to_string(), Some(19.0))]),
        ];
        let session = calculate_session(GameType::ItgStamina, scores.iter());
        assert_eq!(session["blockRating"], Some(19.0));
    }

    #[test]
    fn test_score_calculation() {
        let mut data = ScoreData::default();
        data.metrics
            .insert("score".into(), MetricValue::Integer(1_000_000));
        let chart = ChartRef {
            chart_id: "c".into(),
            song_id: 1,
            game_type: GameType::ChunithmSingle,
            difficulty: "MASTER".into(),
            level: "14".into(),
            level_num: 14.0,
            note_count: None,
            tierlist: Default::default(),
            data: Value::Null,
        };
        let ratings =
            calculate_score(GameType::ChunithmSingle, &data, &chart, &CaptureSink::new()).unwrap();
        assert_eq!(ratings["rating"], Some(15.0));
    }
}
