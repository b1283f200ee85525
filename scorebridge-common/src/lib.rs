//! # scorebridge common library
//!
//! Shared code for the scorebridge score pipeline:
//! - Game-type configuration (metric schemas, enum domains, grade tables)
//! - Metric values and score data containers
//! - Canonical, persisted and reference models
//! - Canonical content hashing
//! - Configuration loading and database initialization

pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod hashing;
pub mod metrics;
pub mod models;

pub use error::{Error, Result};
pub use game::{Game, GameType, GameTypeConfig, ImportType};
pub use metrics::{EnumValue, MetricValue, ScoreData};
