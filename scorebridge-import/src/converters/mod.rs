//! Converter registry
//!
//! One converter per import type. A converter parses the raw submission,
//! resolves its chart and song, and produces a [`DryScore`]. It never writes.

pub mod batch_manual;
pub mod beatoraja;
pub mod fervidex;
pub mod kshook_sv6c;
pub mod score_utils;

use crate::diagnostics::DiagnosticSink;
use crate::error::ImportResult;
use crate::resolver::ReferenceResolver;
use scorebridge_common::models::{ChartRef, DryScore, SongRef};
use scorebridge_common::ImportType;
use serde_json::Value;

/// Successful conversion: the canonical score and what it was resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterOutput {
    pub dry_score: DryScore,
    pub chart: ChartRef,
    pub song: SongRef,
}

/// Convert one raw submission of `import_type`
pub async fn convert(
    import_type: ImportType,
    data: &Value,
    context: &Value,
    resolver: &dyn ReferenceResolver,
    diag: &dyn DiagnosticSink,
) -> ImportResult<ConverterOutput> {
    match import_type {
        ImportType::BatchManual => batch_manual::convert(data, context, resolver, diag).await,
        ImportType::KsHookSv6c => kshook_sv6c::convert(data, context, resolver, diag).await,
        ImportType::Beatoraja => beatoraja::convert(data, context, resolver, diag).await,
        ImportType::Fervidex => fervidex::convert(data, context, resolver, diag).await,
    }
}
