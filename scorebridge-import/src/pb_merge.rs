//! Personal-best merging
//!
//! A personal best starts from the user's best score on the chart by the
//! game-type's default metric. Each merge rule then lends it fields from the
//! score that wins that rule, so a PB can combine the best score with the best
//! lamp from a different play.

use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::game::{MergeStrategy, PbMergeRule};
use scorebridge_common::models::{ChartRef, PbReference, PersonalBest, ScoreRecord, UserId};
use std::cmp::Ordering;
use std::collections::BTreeMap;

fn metric_of(score: &ScoreRecord, path: &str) -> Option<f64> {
    score.score_data.get_path(path).map(|v| v.ordinal())
}

/// Earlier achievements win ties; unknown times sort last, then by id
fn tie_break(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    let time = |s: &ScoreRecord| s.time_achieved.unwrap_or(i64::MAX);
    time(a)
        .cmp(&time(b))
        .then_with(|| a.score_id.cmp(&b.score_id))
}

/// Pick the winner of `metric` under `strategy` among scores carrying it
fn select<'a>(
    scores: &'a [ScoreRecord],
    metric: &str,
    strategy: MergeStrategy,
) -> Option<&'a ScoreRecord> {
    let candidates = scores
        .iter()
        .filter_map(|s| metric_of(s, metric).map(|v| (v, s)));

    match strategy {
        // best value first, then earliest
        MergeStrategy::Largest => candidates
            .min_by(|(va, a), (vb, b)| vb.total_cmp(va).then_with(|| tie_break(a, b)))
            .map(|(_, s)| s),
        MergeStrategy::Smallest => candidates
            .min_by(|(va, a), (vb, b)| va.total_cmp(vb).then_with(|| tie_break(a, b)))
            .map(|(_, s)| s),
        MergeStrategy::MostRecent => candidates
            .filter(|(_, s)| s.time_achieved.is_some())
            .max_by(|(_, a), (_, b)| {
                a.time_achieved
                    .cmp(&b.time_achieved)
                    .then_with(|| b.score_id.cmp(&a.score_id))
            })
            .map(|(_, s)| s),
    }
}

fn apply_rule(pb: &mut PersonalBest, scores: &[ScoreRecord], rule: &PbMergeRule) {
    let Some(winner) = select(scores, rule.metric, rule.strategy) else {
        return;
    };
    for field in rule.fields {
        pb.score_data
            .set_path(field, winner.score_data.get_path(field).cloned());
    }
    if winner.time_achieved > pb.time_achieved {
        pb.time_achieved = winner.time_achieved;
    }
    pb.composed_from.push(PbReference {
        name: rule.name.to_string(),
        score_id: winner.score_id.clone(),
    });
}

/// Merge every score a user holds on one chart into a personal best
///
/// Returns `None` when there are no scores. Ratings are left empty for the
/// caller to compute from the merged data.
pub fn create_pb(
    user_id: UserId,
    chart: &ChartRef,
    scores: &[ScoreRecord],
) -> ImportResult<Option<PersonalBest>> {
    let config = chart.game_type.config();

    if let Some(bad) = scores
        .iter()
        .find(|s| metric_of(s, config.default_metric).is_none())
    {
        return Err(ImportFailure::Internal(format!(
            "Score {} has no {} to merge on.",
            bad.score_id, config.default_metric
        )));
    }

    let Some(base) = select(scores, config.default_metric, MergeStrategy::Largest) else {
        return Ok(None);
    };

    let mut pb = PersonalBest {
        user_id,
        chart_id: chart.chart_id.clone(),
        song_id: chart.song_id,
        game_type: chart.game_type,
        time_achieved: base.time_achieved,
        score_data: base.score_data.clone(),
        composed_from: vec![PbReference {
            name: config.default_merge_ref_name.to_string(),
            score_id: base.score_id.clone(),
        }],
        calculated: BTreeMap::new(),
    };

    for rule in config.pb_merge_rules {
        apply_rule(&mut pb, scores, rule);
    }

    Ok(Some(pb))
}
