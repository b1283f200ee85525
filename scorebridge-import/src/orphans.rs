//! Orphan subsystem
//!
//! Submissions whose chart is unknown are stored whole, keyed by a content
//! hash of what was submitted. Replaying one goes through the same converter
//! and persistence path as a fresh import.

use crate::converters;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::{ImportFailure, ImportResult};
use crate::importer::{now_ms, report_failure, ScoreImporter};
use crate::store::ScoreStore;
use futures::stream::{self, StreamExt};
use scorebridge_common::hashing::content_hash;
use scorebridge_common::models::{OrphanRecord, UserId};
use scorebridge_common::ImportType;
use serde_json::{json, Value};

/// Content address of an orphaned submission
pub fn orphan_id(import_type: ImportType, data: &Value, context: &Value, user_id: UserId) -> String {
    content_hash(
        "O",
        &json!({
            "importType": import_type,
            "data": data,
            "context": context,
            "userID": user_id,
        }),
    )
}

/// Park a submission for later replay
///
/// Returns the orphan id and whether this call created the record. An
/// identical submission already parked is left alone.
pub async fn orphan_score(
    store: &ScoreStore,
    import_type: ImportType,
    user_id: UserId,
    data: &Value,
    context: &Value,
    err_msg: Option<&str>,
    diag: &dyn DiagnosticSink,
) -> ImportResult<(String, bool)> {
    let orphan_id = orphan_id(import_type, data, context, user_id);

    if store.find_orphan(&orphan_id).await?.is_some() {
        diag.debug(&format!("Orphan {} already present", orphan_id));
        return Ok((orphan_id, false));
    }

    let record = OrphanRecord {
        orphan_id: orphan_id.clone(),
        import_type,
        user_id,
        data: data.clone(),
        context: context.clone(),
        err_msg: err_msg.map(str::to_string),
        time_inserted: now_ms(),
    };
    let created = store.insert_orphan(&record).await?;
    if created {
        diag.emit(
            Diagnostic::new(Severity::Debug, "Orphaned score")
                .with("orphan_id", &orphan_id)
                .with("import_type", import_type),
        );
    }
    Ok((orphan_id, created))
}

/// Result of replaying one orphan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReprocessOutcome {
    /// Another replay already removed the record
    AlreadyConsumed,
    /// Chart still unknown; record kept
    Unresolved,
    /// Record kept for a later attempt
    InternalFailure { incident_id: String },
    /// Data can never convert; record deleted
    Discarded { reason: String },
    Resolved {
        score_id: String,
        newly_imported: bool,
    },
}

/// Counts per outcome of a bulk replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReprocessSummary {
    pub resolved: usize,
    pub unresolved: usize,
    pub discarded: usize,
    pub already_consumed: usize,
    pub internal_failures: usize,
}

impl ReprocessSummary {
    fn record(&mut self, outcome: &ReprocessOutcome) {
        match outcome {
            ReprocessOutcome::AlreadyConsumed => self.already_consumed += 1,
            ReprocessOutcome::Unresolved => self.unresolved += 1,
            ReprocessOutcome::InternalFailure { .. } => self.internal_failures += 1,
            ReprocessOutcome::Discarded { .. } => self.discarded += 1,
            ReprocessOutcome::Resolved { .. } => self.resolved += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.resolved + self.unresolved + self.discarded + self.already_consumed + self.internal_failures
    }
}

/// Log a failure that must not cost the orphan its record
fn internal(
    failure: &ImportFailure,
    orphan: &OrphanRecord,
    diag: &dyn DiagnosticSink,
) -> ReprocessOutcome {
    let incident_id = report_failure(failure, diag, orphan.user_id, orphan.import_type)
        .unwrap_or_default();
    ReprocessOutcome::InternalFailure { incident_id }
}

/// Replay one orphan against the current reference data
///
/// Safe to run concurrently for the same orphan: the score id deduplicates
/// the import and only the replay whose delete removed the record reports
/// `Resolved`.
pub async fn reprocess_orphan(
    importer: &ScoreImporter,
    orphan: &OrphanRecord,
    diag: &dyn DiagnosticSink,
) -> ReprocessOutcome {
    let store = importer.store();

    let orphan = match store.find_orphan(&orphan.orphan_id).await {
        Ok(Some(current)) => current,
        Ok(None) => {
            diag.debug(&format!("Orphan {} already consumed", orphan.orphan_id));
            return ReprocessOutcome::AlreadyConsumed;
        }
        Err(e) => return internal(&ImportFailure::from(e), orphan, diag),
    };

    let converted = converters::convert(
        orphan.import_type,
        &orphan.data,
        &orphan.context,
        importer.resolver(),
        diag,
    )
    .await;

    let output = match converted {
        Ok(output) => output,
        Err(ImportFailure::ReferenceNotFound { .. }) => {
            diag.debug(&format!("Orphan {} is still unresolved", orphan.orphan_id));
            return ReprocessOutcome::Unresolved;
        }
        Err(ImportFailure::Converter(reason)) => {
            diag.emit(
                Diagnostic::new(Severity::Info, "Discarding unconvertible orphan")
                    .with("orphan_id", &orphan.orphan_id)
                    .with("reason", &reason),
            );
            return match store.remove_orphan(&orphan.orphan_id).await {
                Ok(true) => ReprocessOutcome::Discarded { reason },
                Ok(false) => ReprocessOutcome::AlreadyConsumed,
                Err(e) => internal(&ImportFailure::from(e), &orphan, diag),
            };
        }
        Err(failure) => return internal(&failure, &orphan, diag),
    };

    let game_type = output.dry_score.game_type;
    let (record, inserted) = match importer
        .process_successful_conversion(orphan.user_id, output, diag)
        .await
    {
        Ok(done) => done,
        Err(failure) => return internal(&failure, &orphan, diag),
    };

    let removed = match store.remove_orphan(&orphan.orphan_id).await {
        Ok(removed) => removed,
        Err(e) => return internal(&ImportFailure::from(e), &orphan, diag),
    };

    if let Err(failure) = importer.update_profile(orphan.user_id, game_type).await {
        return internal(&failure, &orphan, diag);
    }

    if !removed {
        return ReprocessOutcome::AlreadyConsumed;
    }

    diag.emit(
        Diagnostic::new(Severity::Info, "Resolved orphan")
            .with("orphan_id", &orphan.orphan_id)
            .with("score_id", &record.score_id),
    );
    ReprocessOutcome::Resolved {
        score_id: record.score_id,
        newly_imported: inserted,
    }
}

/// A user's parked submissions, oldest first
pub async fn list_orphans(store: &ScoreStore, user_id: UserId) -> ImportResult<Vec<OrphanRecord>> {
    Ok(store.orphans_for_user(user_id).await?)
}

/// Replay every orphan a user holds
pub async fn reprocess_orphans(
    importer: &ScoreImporter,
    user_id: UserId,
    diag: &dyn DiagnosticSink,
) -> ImportResult<ReprocessSummary> {
    let orphans = list_orphans(importer.store(), user_id).await?;
    diag.emit(
        Diagnostic::new(Severity::Info, "Reprocessing orphans")
            .with("user_id", user_id)
            .with("count", orphans.len()),
    );

    let outcomes: Vec<ReprocessOutcome> = stream::iter(&orphans)
        .map(|orphan| reprocess_orphan(importer, orphan, diag))
        .buffer_unordered(importer.settings().orphan_concurrency.max(1))
        .collect()
        .await;

    let mut summary = ReprocessSummary::default();
    for outcome in &outcomes {
        summary.record(outcome);
    }

    diag.emit(
        Diagnostic::new(Severity::Info, "Orphan reprocessing finished")
            .with("user_id", user_id)
            .with("resolved", summary.resolved)
            .with("unresolved", summary.unresolved)
            .with("discarded", summary.discarded)
            .with("failed", summary.internal_failures),
    );
    Ok(summary)
}
