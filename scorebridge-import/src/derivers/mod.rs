//! Deriver registry
//!
//! Every game-type declares its derived metrics in its configuration; this
//! module maps each one to a pure function of the primary metrics and the
//! chart. The registry and the configuration must agree exactly.

mod graded;
mod iidx_like;
mod itg;
mod popn;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::{ImportFailure, ImportResult};
use scorebridge_common::game::{get_grade, GradeBoundary, MetricKind};
use scorebridge_common::metrics::{MetricValue, ScoreData};
use scorebridge_common::models::ChartRef;
use scorebridge_common::GameType;
use std::collections::BTreeMap;

/// Raw deriver output, checked against the metric's domain afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derived {
    Number(f64),
    Label(&'static str),
}

pub type DeriveFn = fn(&ScoreData, &ChartRef) -> ImportResult<Derived>;

#[derive(Clone, Copy)]
pub struct Deriver {
    pub metric: &'static str,
    pub derive: DeriveFn,
}

const fn deriver(metric: &'static str, derive: DeriveFn) -> Deriver {
    Deriver { metric, derive }
}

/// Grade a value with a boundary table
pub(crate) fn grade(boundaries: &[GradeBoundary], value: f64) -> ImportResult<Derived> {
    Ok(Derived::Label(get_grade(boundaries, value)?))
}

const IIDX_LIKE: &[Deriver] = &[
    deriver("percent", iidx_like::percent),
    deriver("grade", iidx_like::grade),
];
const SDVX_LIKE: &[Deriver] = &[deriver("grade", graded::sdvx)];
const CHUNITHM: &[Deriver] = &[deriver("grade", graded::chunithm)];
const WACCA: &[Deriver] = &[deriver("grade", graded::wacca)];
const JUBEAT: &[Deriver] = &[deriver("grade", graded::jubeat)];
const GITADORA: &[Deriver] = &[deriver("grade", graded::gitadora)];
const MAIMAIDX: &[Deriver] = &[deriver("grade", graded::maimaidx)];
const MUSECA: &[Deriver] = &[deriver("grade", graded::museca)];
const ITG: &[Deriver] = &[
    deriver("finalPercent", itg::final_percent),
    deriver("grade", itg::grade),
];
const POPN: &[Deriver] = &[deriver("lamp", popn::lamp), deriver("grade", popn::grade)];

pub fn derivers_for(game_type: GameType) -> &'static [Deriver] {
    match game_type {
        GameType::IidxSp
        | GameType::IidxDp
        | GameType::Bms7K
        | GameType::Bms14K
        | GameType::PmsController
        | GameType::PmsKeyboard => IIDX_LIKE,
        GameType::SdvxSingle | GameType::UscController | GameType::UscKeyboard => SDVX_LIKE,
        GameType::ChunithmSingle => CHUNITHM,
        GameType::WaccaSingle => WACCA,
        GameType::JubeatSingle => JUBEAT,
        GameType::GitadoraGita | GameType::GitadoraDora => GITADORA,
        GameType::ItgStamina => ITG,
        GameType::MaimaidxSingle => MAIMAIDX,
        GameType::MusecaSingle => MUSECA,
        GameType::Popn9B => POPN,
    }
}

/// The caller reports the returned failure at severe level with an incident id
fn internal(diag: &dyn DiagnosticSink, game_type: GameType, msg: String) -> ImportFailure {
    diag.emit(Diagnostic::new(Severity::Debug, msg.clone()).with("game_type", game_type));
    ImportFailure::Internal(msg)
}

/// Compute every derived metric of `game_type` for one score
pub fn derive_metrics(
    game_type: GameType,
    data: &ScoreData,
    chart: &ChartRef,
    diag: &dyn DiagnosticSink,
) -> ImportResult<BTreeMap<String, MetricValue>> {
    let config = game_type.config();
    let mut derived = BTreeMap::new();

    for d in derivers_for(game_type) {
        let Some(spec) = config.derived_metric(d.metric) else {
            return Err(internal(
                diag,
                game_type,
                format!("Deriver '{}' has no configuration entry for {}.", d.metric, game_type),
            ));
        };

        let value = match ((d.derive)(data, chart)?, spec.kind) {
            (Derived::Label(label), MetricKind::Enum { .. }) => {
                match config.enum_value(d.metric, label) {
                    Ok(v) => MetricValue::Enum(v),
                    Err(e) => return Err(internal(diag, game_type, e.to_string())),
                }
            }
            (Derived::Number(n), MetricKind::Integer { .. }) if spec.in_range(n) => {
                MetricValue::Integer(n as i64)
            }
            (Derived::Number(n), MetricKind::Decimal { .. }) if spec.in_range(n) => {
                MetricValue::Decimal(n)
            }
            (out, _) => {
                return Err(internal(
                    diag,
                    game_type,
                    format!("Derived {} produced {:?}, outside its domain.", d.metric, out),
                ))
            }
        };
        derived.insert(d.metric.to_string(), value);
    }

    for spec in config.derived_metrics {
        if !derived.contains_key(spec.name) {
            return Err(internal(
                diag,
                game_type,
                format!("{} declares derived metric '{}' but no deriver produces it.", game_type, spec.name),
            ));
        }
    }

    Ok(derived)
}
