//! # scorebridge import pipeline
//!
//! Drives raw score submissions through
//! converter → reference resolver → derivers → calculators → store.
//! Submissions whose chart is not known yet are kept as orphans and replayed
//! later through the same path.

pub mod calculators;
pub mod converters;
pub mod derivers;
pub mod diagnostics;
pub mod error;
pub mod importer;
mod locks;
pub mod orphans;
pub mod pb_merge;
pub mod resolver;
pub mod store;

pub use diagnostics::{CaptureSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::{FailureKind, ImportFailure, ImportResult};
pub use importer::{ItemOutcome, ScoreImporter};
pub use orphans::{ReprocessOutcome, ReprocessSummary};
pub use resolver::{ChartKey, InMemoryReferenceStore, ReferenceResolver, SqliteReferenceStore};
pub use store::ScoreStore;
