//! Import orchestrator
//!
//! Runs one submission through converter → derivers → calculators → store,
//! and routes failures: unknown charts become orphans, converter failures are
//! rejected, internal and store failures are reported under an incident id.

use crate::calculators::{self, Ratings};
use crate::converters::{self, ConverterOutput};
use crate::derivers;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::error::{FailureKind, ImportFailure, ImportResult};
use crate::locks::KeyedLocks;
use crate::orphans;
use crate::pb_merge;
use crate::resolver::ReferenceResolver;
use crate::store::ScoreStore;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use scorebridge_common::config::ImportSettings;
use scorebridge_common::hashing::content_hash;
use scorebridge_common::metrics::ScoreData;
use scorebridge_common::models::{
    ChartRef, GameStats, ImportDocument, ImportErrorEntry, ScoreRecord, UserId,
};
use scorebridge_common::{GameType, ImportType};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use uuid::Uuid;

/// What happened to one submitted item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Imported {
        score_id: String,
        game_type: GameType,
        calculated: Ratings,
    },
    /// Identical score already stored
    Duplicate {
        score_id: String,
        game_type: GameType,
    },
    /// Chart unknown; parked for replay
    Orphaned {
        orphan_id: String,
        newly_created: bool,
    },
    Failed {
        kind: FailureKind,
        message: String,
        incident_id: Option<String>,
    },
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Content address of a score: the same play always gets the same id
pub fn score_id(
    user_id: UserId,
    game_type: GameType,
    chart_id: &str,
    score_data: &ScoreData,
    time_achieved: Option<i64>,
) -> ImportResult<String> {
    let score_data = serde_json::to_value(score_data)
        .map_err(|e| ImportFailure::Internal(format!("Unserializable score data: {}", e)))?;
    Ok(content_hash(
        "R",
        &json!({
            "userID": user_id,
            "gameType": game_type,
            "chartID": chart_id,
            "scoreData": score_data,
            "timeAchieved": time_achieved,
        }),
    ))
}

/// Emit the diagnostic for a failure and return its incident id, if any
///
/// Reference misses are routine (debug), converter failures are the
/// submitter's problem (warn). Internal and store failures get an incident id
/// so the user-facing message can point at the log entry.
pub(crate) fn report_failure(
    failure: &ImportFailure,
    diag: &dyn DiagnosticSink,
    user_id: UserId,
    import_type: ImportType,
) -> Option<String> {
    let (severity, incident_id) = match failure {
        ImportFailure::ReferenceNotFound { .. } => (Severity::Debug, None),
        ImportFailure::Converter(_) => (Severity::Warn, None),
        ImportFailure::Internal(_) => (Severity::Severe, Some(Uuid::new_v4().to_string())),
        ImportFailure::Store(_) => (Severity::Error, Some(Uuid::new_v4().to_string())),
    };

    let mut d = Diagnostic::new(severity, failure.to_string())
        .with("user_id", user_id)
        .with("import_type", import_type)
        .with("kind", failure.kind().as_str());
    if let Some(id) = &incident_id {
        d = d.with("incident_id", id);
    }
    diag.emit(d);
    incident_id
}

pub struct ScoreImporter {
    resolver: Arc<dyn ReferenceResolver>,
    store: ScoreStore,
    settings: ImportSettings,
    /// Serializes PB and profile rebuilds per user and chart / game-type
    rebuild_locks: KeyedLocks,
}

impl ScoreImporter {
    pub fn new(
        resolver: Arc<dyn ReferenceResolver>,
        store: ScoreStore,
        settings: ImportSettings,
    ) -> Self {
        Self {
            resolver,
            store,
            settings,
            rebuild_locks: KeyedLocks::new(),
        }
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    pub fn resolver(&self) -> &dyn ReferenceResolver {
        self.resolver.as_ref()
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Convert and persist one submission
    pub async fn import_one(
        &self,
        user_id: UserId,
        import_type: ImportType,
        data: &Value,
        context: &Value,
        diag: &dyn DiagnosticSink,
    ) -> ItemOutcome {
        let converted =
            converters::convert(import_type, data, context, self.resolver(), diag).await;

        let result = match converted {
            Ok(output) => self.process_successful_conversion(user_id, output, diag).await,
            Err(e) => Err(e),
        };

        let failure = match result {
            Ok((record, true)) => {
                diag.debug(&format!("Imported score {}", record.score_id));
                return ItemOutcome::Imported {
                    score_id: record.score_id,
                    game_type: record.game_type,
                    calculated: record.calculated,
                };
            }
            Ok((record, false)) => {
                diag.debug(&format!("Skipped duplicate score {}", record.score_id));
                return ItemOutcome::Duplicate {
                    score_id: record.score_id,
                    game_type: record.game_type,
                };
            }
            Err(failure) => failure,
        };

        let incident_id = report_failure(&failure, diag, user_id, import_type);

        if let ImportFailure::ReferenceNotFound {
            message,
            import_type,
            data,
            context,
        } = &failure
        {
            match orphans::orphan_score(
                &self.store,
                *import_type,
                user_id,
                data,
                context,
                Some(message.as_str()),
                diag,
            )
            .await
            {
                Ok((orphan_id, newly_created)) => {
                    return ItemOutcome::Orphaned {
                        orphan_id,
                        newly_created,
                    }
                }
                Err(failure) => {
                    let incident_id = report_failure(&failure, diag, user_id, *import_type);
                    return ItemOutcome::Failed {
                        kind: failure.kind(),
                        message: failure.user_message(incident_id.as_deref().unwrap_or("")),
                        incident_id,
                    };
                }
            }
        }

        ItemOutcome::Failed {
            kind: failure.kind(),
            message: failure.user_message(incident_id.as_deref().unwrap_or("")),
            incident_id,
        }
    }

    /// Derive, rate and store a converted score, then refresh its PB
    ///
    /// Returns the record and whether it was newly inserted. The record is
    /// fully built before the single write, so a failure leaves nothing behind.
    /// The PB is rebuilt for duplicates too, so an earlier attempt that stored
    /// the score but failed before its PB write is repaired.
    pub(crate) async fn process_successful_conversion(
        &self,
        user_id: UserId,
        output: ConverterOutput,
        diag: &dyn DiagnosticSink,
    ) -> ImportResult<(ScoreRecord, bool)> {
        let ConverterOutput {
            dry_score,
            chart,
            song,
        } = output;
        let game_type = dry_score.game_type;

        let mut score_data = dry_score.score_data;
        score_data.derived = derivers::derive_metrics(game_type, &score_data, &chart, diag)?;
        let calculated = calculators::calculate_score(game_type, &score_data, &chart, diag)?;

        let score_id = score_id(
            user_id,
            game_type,
            &chart.chart_id,
            &score_data,
            dry_score.time_achieved,
        )?;

        let record = ScoreRecord {
            score_id,
            user_id,
            game_type,
            chart_id: chart.chart_id.clone(),
            song_id: song.song_id,
            import_type: dry_score.import_type,
            service: dry_score.service,
            comment: dry_score.comment,
            time_achieved: dry_score.time_achieved,
            time_added: now_ms(),
            score_data,
            score_meta: dry_score.score_meta,
            calculated,
        };

        let inserted = self.store.insert_score(&record).await?;
        self.update_personal_best(user_id, &chart, diag).await?;
        Ok((record, inserted))
    }

    /// Rebuild the user's PB on `chart` from all their scores
    pub async fn update_personal_best(
        &self,
        user_id: UserId,
        chart: &ChartRef,
        diag: &dyn DiagnosticSink,
    ) -> ImportResult<()> {
        let _guard = self
            .rebuild_locks
            .acquire(format!("pb:{}:{}", user_id, chart.chart_id))
            .await;

        let scores = self.store.scores_for_chart(user_id, &chart.chart_id).await?;
        let Some(mut pb) = pb_merge::create_pb(user_id, chart, &scores)? else {
            return Ok(());
        };
        pb.calculated = calculators::calculate_score(chart.game_type, &pb.score_data, chart, diag)?;
        self.store.upsert_personal_best(&pb).await?;
        Ok(())
    }

    /// Recompute profile ratings and classes for one game-type
    pub async fn update_profile(
        &self,
        user_id: UserId,
        game_type: GameType,
    ) -> ImportResult<GameStats> {
        let _guard = self
            .rebuild_locks
            .acquire(format!("profile:{}:{}", user_id, game_type))
            .await;

        let pbs = self.store.personal_bests(user_id, game_type).await?;
        let ratings = calculators::calculate_profile(game_type, pbs.iter().map(|pb| &pb.calculated));
        let classes = calculators::derive_classes(game_type, &ratings)?;

        let stats = GameStats {
            user_id,
            game_type,
            ratings,
            classes,
            time_updated: now_ms(),
        };
        self.store.upsert_game_stats(&stats).await?;
        Ok(stats)
    }

    /// Import a batch of items sharing one context
    ///
    /// Items run concurrently and fail independently. Session ratings are
    /// computed per game-type over the newly imported scores, and the
    /// profile of every touched game-type is refreshed.
    pub async fn import_batch(
        &self,
        user_id: UserId,
        import_type: ImportType,
        items: &[Value],
        context: &Value,
        diag: &dyn DiagnosticSink,
    ) -> ImportResult<ImportDocument> {
        let time_started = now_ms();
        let import_id = Uuid::new_v4().to_string();
        diag.emit(
            Diagnostic::new(Severity::Info, "Starting import")
                .with("import_id", &import_id)
                .with("user_id", user_id)
                .with("import_type", import_type)
                .with("items", items.len()),
        );

        let outcomes: Vec<ItemOutcome> = stream::iter(items)
            .map(|data| self.import_one(user_id, import_type, data, context, diag))
            .buffered(self.settings.item_concurrency.max(1))
            .collect()
            .await;

        let mut score_ids = Vec::new();
        let mut orphan_ids = Vec::new();
        let mut errors = Vec::new();
        let mut session_scores: BTreeMap<GameType, Vec<Ratings>> = BTreeMap::new();
        let mut touched = BTreeSet::new();

        for outcome in outcomes {
            match outcome {
                ItemOutcome::Imported {
                    score_id,
                    game_type,
                    calculated,
                } => {
                    score_ids.push(score_id);
                    touched.insert(game_type);
                    session_scores.entry(game_type).or_default().push(calculated);
                }
                ItemOutcome::Duplicate { game_type, .. } => {
                    touched.insert(game_type);
                }
                ItemOutcome::Orphaned { orphan_id, .. } => orphan_ids.push(orphan_id),
                ItemOutcome::Failed { kind, message, .. } => errors.push(ImportErrorEntry {
                    kind: kind.as_str().to_string(),
                    message,
                }),
            }
        }

        let session_ratings = session_scores
            .iter()
            .map(|(gt, scores)| (*gt, calculators::calculate_session(*gt, scores.iter())))
            .collect();

        for game_type in touched {
            self.update_profile(user_id, game_type).await?;
        }

        let doc = ImportDocument {
            import_id,
            user_id,
            import_type,
            score_ids,
            orphan_ids,
            errors,
            session_ratings,
            time_started,
            time_finished: now_ms(),
        };
        self.store.insert_import(&doc).await?;

        diag.emit(
            Diagnostic::new(Severity::Info, "Import finished")
                .with("import_id", &doc.import_id)
                .with("imported", doc.score_ids.len())
                .with("orphaned", doc.orphan_ids.len())
                .with("failed", doc.errors.len()),
        );
        Ok(doc)
    }
}
