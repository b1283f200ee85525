//! Games, game-types and import types
//!
//! A game-type is a (game, playtype) pair with its own metric schema, grade
//! tables and rating formulas. Every registry in the pipeline dispatches on
//! [`GameType`] with an exhaustive `match`, so a new variant cannot be added
//! without wiring each registry.

pub mod config;
pub mod grades;
pub mod tables;

pub use config::{
    ClassSpec, ConfigError, GameTypeConfig, MergeStrategy, MetricKind, MetricSpec, PbMergeRule,
};
pub use grades::{get_grade, GradeBoundary, GradeError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rhythm game title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Iidx,
    Bms,
    Pms,
    Sdvx,
    Usc,
    Chunithm,
    Wacca,
    Jubeat,
    Gitadora,
    Itg,
    Maimaidx,
    Museca,
    Popn,
}

impl Game {
    pub fn as_str(self) -> &'static str {
        match self {
            Game::Iidx => "iidx",
            Game::Bms => "bms",
            Game::Pms => "pms",
            Game::Sdvx => "sdvx",
            Game::Usc => "usc",
            Game::Chunithm => "chunithm",
            Game::Wacca => "wacca",
            Game::Jubeat => "jubeat",
            Game::Gitadora => "gitadora",
            Game::Itg => "itg",
            Game::Maimaidx => "maimaidx",
            Game::Museca => "museca",
            Game::Popn => "popn",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (game, playtype) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "iidx:SP")]
    IidxSp,
    #[serde(rename = "iidx:DP")]
    IidxDp,
    #[serde(rename = "bms:7K")]
    Bms7K,
    #[serde(rename = "bms:14K")]
    Bms14K,
    #[serde(rename = "pms:Controller")]
    PmsController,
    #[serde(rename = "pms:Keyboard")]
    PmsKeyboard,
    #[serde(rename = "sdvx:Single")]
    SdvxSingle,
    #[serde(rename = "usc:Controller")]
    UscController,
    #[serde(rename = "usc:Keyboard")]
    UscKeyboard,
    #[serde(rename = "chunithm:Single")]
    ChunithmSingle,
    #[serde(rename = "wacca:Single")]
    WaccaSingle,
    #[serde(rename = "jubeat:Single")]
    JubeatSingle,
    #[serde(rename = "gitadora:Gita")]
    GitadoraGita,
    #[serde(rename = "gitadora:Dora")]
    GitadoraDora,
    #[serde(rename = "itg:Stamina")]
    ItgStamina,
    #[serde(rename = "maimaidx:Single")]
    MaimaidxSingle,
    #[serde(rename = "museca:Single")]
    MusecaSingle,
    #[serde(rename = "popn:9B")]
    Popn9B,
}

impl GameType {
    pub const ALL: [GameType; 18] = [
        GameType::IidxSp,
        GameType::IidxDp,
        GameType::Bms7K,
        GameType::Bms14K,
        GameType::PmsController,
        GameType::PmsKeyboard,
        GameType::SdvxSingle,
        GameType::UscController,
        GameType::UscKeyboard,
        GameType::ChunithmSingle,
        GameType::WaccaSingle,
        GameType::JubeatSingle,
        GameType::GitadoraGita,
        GameType::GitadoraDora,
        GameType::ItgStamina,
        GameType::MaimaidxSingle,
        GameType::MusecaSingle,
        GameType::Popn9B,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameType::IidxSp => "iidx:SP",
            GameType::IidxDp => "iidx:DP",
            GameType::Bms7K => "bms:7K",
            GameType::Bms14K => "bms:14K",
            GameType::PmsController => "pms:Controller",
            GameType::PmsKeyboard => "pms:Keyboard",
            GameType::SdvxSingle => "sdvx:Single",
            GameType::UscController => "usc:Controller",
            GameType::UscKeyboard => "usc:Keyboard",
            GameType::ChunithmSingle => "chunithm:Single",
            GameType::WaccaSingle => "wacca:Single",
            GameType::JubeatSingle => "jubeat:Single",
            GameType::GitadoraGita => "gitadora:Gita",
            GameType::GitadoraDora => "gitadora:Dora",
            GameType::ItgStamina => "itg:Stamina",
            GameType::MaimaidxSingle => "maimaidx:Single",
            GameType::MusecaSingle => "museca:Single",
            GameType::Popn9B => "popn:9B",
        }
    }

    pub fn game(self) -> Game {
        match self {
            GameType::IidxSp | GameType::IidxDp => Game::Iidx,
            GameType::Bms7K | GameType::Bms14K => Game::Bms,
            GameType::PmsController | GameType::PmsKeyboard => Game::Pms,
            GameType::SdvxSingle => Game::Sdvx,
            GameType::UscController | GameType::UscKeyboard => Game::Usc,
            GameType::ChunithmSingle => Game::Chunithm,
            GameType::WaccaSingle => Game::Wacca,
            GameType::JubeatSingle => Game::Jubeat,
            GameType::GitadoraGita | GameType::GitadoraDora => Game::Gitadora,
            GameType::ItgStamina => Game::Itg,
            GameType::MaimaidxSingle => Game::Maimaidx,
            GameType::MusecaSingle => Game::Museca,
            GameType::Popn9B => Game::Popn,
        }
    }

    /// Playtype half of the identifier ("SP", "7K", "Single", ...)
    pub fn playtype(self) -> &'static str {
        let s = self.as_str();
        // every identifier is "<game>:<playtype>"
        match s.split_once(':') {
            Some((_, playtype)) => playtype,
            None => s,
        }
    }

    /// Static configuration for this game-type
    pub fn config(self) -> &'static GameTypeConfig {
        tables::config_for(self)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .iter()
            .copied()
            .find(|gt| gt.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown game-type '{}'", s)))
    }
}

/// Submission source format. Each variant has exactly one converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImportType {
    #[serde(rename = "file/batch-manual")]
    BatchManual,
    #[serde(rename = "ir/kshook-sv6c")]
    KsHookSv6c,
    #[serde(rename = "ir/beatoraja")]
    Beatoraja,
    #[serde(rename = "ir/fervidex")]
    Fervidex,
}

impl ImportType {
    pub const ALL: [ImportType; 4] = [
        ImportType::BatchManual,
        ImportType::KsHookSv6c,
        ImportType::Beatoraja,
        ImportType::Fervidex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImportType::BatchManual => "file/batch-manual",
            ImportType::KsHookSv6c => "ir/kshook-sv6c",
            ImportType::Beatoraja => "ir/beatoraja",
            ImportType::Fervidex => "ir/fervidex",
        }
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImportType::ALL
            .iter()
            .copied()
            .find(|it| it.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown import type '{}'", s)))
    }
}
