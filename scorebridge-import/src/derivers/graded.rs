//! Plain grade lookups on score or percent

use super::{grade, Derived};
use crate::error::ImportResult;
use scorebridge_common::game::tables::{
    CHUNITHM_GBOUNDARIES, GITADORA_GBOUNDARIES, JUBEAT_GBOUNDARIES, MAIMAIDX_GBOUNDARIES,
    MUSECA_GBOUNDARIES, SDVX_GBOUNDARIES, WACCA_GBOUNDARIES,
};
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::ChartRef;

pub fn sdvx(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(SDVX_GBOUNDARIES, data.number("score")?)
}

pub fn chunithm(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(CHUNITHM_GBOUNDARIES, data.number("score")?)
}

pub fn wacca(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(WACCA_GBOUNDARIES, data.number("score")?)
}

pub fn jubeat(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(JUBEAT_GBOUNDARIES, data.number("score")?)
}

pub fn museca(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(MUSECA_GBOUNDARIES, data.number("score")?)
}

pub fn gitadora(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(GITADORA_GBOUNDARIES, data.number("percent")?)
}

pub fn maimaidx(data: &ScoreData, _chart: &ChartRef) -> ImportResult<Derived> {
    grade(MAIMAIDX_GBOUNDARIES, data.number("percent")?)
}
