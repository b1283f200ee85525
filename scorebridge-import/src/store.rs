//! Document store for scores, personal bests, orphans, stats and imports
//!
//! Each record is one JSON document plus the key columns queries filter on.
//! Every write is a single statement, so a score is either fully stored or
//! not at all. Writes retry on lock contention.

use scorebridge_common::db::retry_on_lock;
use scorebridge_common::models::{
    GameStats, ImportDocument, OrphanRecord, PersonalBest, ScoreRecord, UserId,
};
use scorebridge_common::{GameType, Result};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ScoreStore {
    pool: SqlitePool,
    max_lock_wait_ms: u64,
}

fn decode_all<T: DeserializeOwned>(docs: Vec<String>) -> Result<Vec<T>> {
    docs.iter()
        .map(|doc| serde_json::from_str(doc).map_err(Into::into))
        .collect()
}

fn decode_opt<T: DeserializeOwned>(doc: Option<String>) -> Result<Option<T>> {
    match doc {
        Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
        None => Ok(None),
    }
}

impl ScoreStore {
    pub fn new(pool: SqlitePool, max_lock_wait_ms: u64) -> Self {
        Self {
            pool,
            max_lock_wait_ms,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ------------------------------------------------------------------
    // Scores
    // ------------------------------------------------------------------

    /// Insert a score; false when the score id is already stored
    pub async fn insert_score(&self, score: &ScoreRecord) -> Result<bool> {
        let doc = serde_json::to_string(score)?;
        let (doc, pool) = (&doc, &self.pool);

        let result = retry_on_lock("insert score", self.max_lock_wait_ms, || async move {
            Ok(sqlx::query(
                r#"
                INSERT OR IGNORE INTO scores (score_id, user_id, game_type, chart_id, time_added, doc)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&score.score_id)
            .bind(score.user_id)
            .bind(score.game_type.as_str())
            .bind(&score.chart_id)
            .bind(score.time_added)
            .bind(doc)
            .execute(pool)
            .await?)
        })
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find_score(&self, score_id: &str) -> Result<Option<ScoreRecord>> {
        let doc: Option<String> = sqlx::query_scalar("SELECT doc FROM scores WHERE score_id = ?")
            .bind(score_id)
            .fetch_optional(&self.pool)
            .await?;
        decode_opt(doc)
    }

    pub async fn scores_for_chart(&self, user_id: UserId, chart_id: &str) -> Result<Vec<ScoreRecord>> {
        let docs: Vec<String> = sqlx::query_scalar(
            "SELECT doc FROM scores WHERE user_id = ? AND chart_id = ? ORDER BY score_id",
        )
        .bind(user_id)
        .bind(chart_id)
        .fetch_all(&self.pool)
        .await?;
        decode_all(docs)
    }

    pub async fn count_scores(&self, user_id: UserId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scores WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Personal bests
    // ------------------------------------------------------------------

    pub async fn upsert_personal_best(&self, pb: &PersonalBest) -> Result<()> {
        let doc = serde_json::to_string(pb)?;
        let (doc, pool) = (&doc, &self.pool);

        retry_on_lock("upsert personal best", self.max_lock_wait_ms, || async move {
            sqlx::query(
                r#"
                INSERT INTO personal_bests (user_id, chart_id, game_type, doc) VALUES (?, ?, ?, ?)
                ON CONFLICT(user_id, chart_id) DO UPDATE SET doc = excluded.doc
                "#,
            )
            .bind(pb.user_id)
            .bind(&pb.chart_id)
            .bind(pb.game_type.as_str())
            .bind(doc)
            .execute(pool)
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn find_personal_best(
        &self,
        user_id: UserId,
        chart_id: &str,
    ) -> Result<Option<PersonalBest>> {
        let doc: Option<String> =
            sqlx::query_scalar("SELECT doc FROM personal_bests WHERE user_id = ? AND chart_id = ?")
                .bind(user_id)
                .bind(chart_id)
                .fetch_optional(&self.pool)
                .await?;
        decode_opt(doc)
    }

    pub async fn personal_bests(
        &self,
        user_id: UserId,
        game_type: GameType,
    ) -> Result<Vec<PersonalBest>> {
        let docs: Vec<String> = sqlx::query_scalar(
            "SELECT doc FROM personal_bests WHERE user_id = ? AND game_type = ? ORDER BY chart_id",
        )
        .bind(user_id)
        .bind(game_type.as_str())
        .fetch_all(&self.pool)
        .await?;
        decode_all(docs)
    }

    // ------------------------------------------------------------------
    // Game stats
    // ------------------------------------------------------------------

    pub async fn upsert_game_stats(&self, stats: &GameStats) -> Result<()> {
        let doc = serde_json::to_string(stats)?;
        let (doc, pool) = (&doc, &self.pool);

        retry_on_lock("upsert game stats", self.max_lock_wait_ms, || async move {
            sqlx::query(
                r#"
                INSERT INTO game_stats (user_id, game_type, doc) VALUES (?, ?, ?)
                ON CONFLICT(user_id, game_type) DO UPDATE SET doc = excluded.doc
                "#,
            )
            .bind(stats.user_id)
            .bind(stats.game_type.as_str())
            .bind(doc)
            .execute(pool)
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn find_game_stats(
        &self,
        user_id: UserId,
        game_type: GameType,
    ) -> Result<Option<GameStats>> {
        let doc: Option<String> =
            sqlx::query_scalar("SELECT doc FROM game_stats WHERE user_id = ? AND game_type = ?")
                .bind(user_id)
                .bind(game_type.as_str())
                .fetch_optional(&self.pool)
                .await?;
        decode_opt(doc)
    }

    // ------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------

    pub async fn insert_import(&self, import: &ImportDocument) -> Result<()> {
        let doc = serde_json::to_string(import)?;
        let (doc, pool) = (&doc, &self.pool);

        retry_on_lock("insert import", self.max_lock_wait_ms, || async move {
            sqlx::query(
                "INSERT INTO imports (import_id, user_id, time_started, doc) VALUES (?, ?, ?, ?)",
            )
            .bind(&import.import_id)
            .bind(import.user_id)
            .bind(import.time_started)
            .bind(doc)
            .execute(pool)
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn find_import(&self, import_id: &str) -> Result<Option<ImportDocument>> {
        let doc: Option<String> = sqlx::query_scalar("SELECT doc FROM imports WHERE import_id = ?")
            .bind(import_id)
            .fetch_optional(&self.pool)
            .await?;
        decode_opt(doc)
    }

    // ------------------------------------------------------------------
    // Orphans
    // ------------------------------------------------------------------

    /// Insert an orphan unless its id is already present
    ///
    /// The primary key makes concurrent identical inserts converge on one row;
    /// exactly one caller sees `true`.
    pub async fn insert_orphan(&self, orphan: &OrphanRecord) -> Result<bool> {
        let doc = serde_json::to_string(orphan)?;
        let (doc, pool) = (&doc, &self.pool);

        let result = retry_on_lock("insert orphan", self.max_lock_wait_ms, || async move {
            Ok(sqlx::query(
                r#"
                INSERT OR IGNORE INTO orphan_scores (orphan_id, user_id, import_type, time_inserted, doc)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&orphan.orphan_id)
            .bind(orphan.user_id)
            .bind(orphan.import_type.as_str())
            .bind(orphan.time_inserted)
            .bind(doc)
            .execute(pool)
            .await?)
        })
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find_orphan(&self, orphan_id: &str) -> Result<Option<OrphanRecord>> {
        let doc: Option<String> =
            sqlx::query_scalar("SELECT doc FROM orphan_scores WHERE orphan_id = ?")
                .bind(orphan_id)
                .fetch_optional(&self.pool)
                .await?;
        decode_opt(doc)
    }

    pub async fn orphans_for_user(&self, user_id: UserId) -> Result<Vec<OrphanRecord>> {
        let docs: Vec<String> = sqlx::query_scalar(
            "SELECT doc FROM orphan_scores WHERE user_id = ? ORDER BY time_inserted, orphan_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        decode_all(docs)
    }

    /// Delete an orphan; false when it was already gone
    pub async fn remove_orphan(&self, orphan_id: &str) -> Result<bool> {
        let pool = &self.pool;

        let result = retry_on_lock("remove orphan", self.max_lock_wait_ms, || async move {
            Ok(sqlx::query("DELETE FROM orphan_scores WHERE orphan_id = ?")
                .bind(orphan_id)
                .execute(pool)
                .await?)
        })
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
