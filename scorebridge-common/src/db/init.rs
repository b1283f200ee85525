//! Database initialization
//!
//! Every table stores its document as JSON text alongside the key columns the
//! pipeline filters on. Schema creation is idempotent and runs on every open.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT_MS: u64 = 250;

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets readers proceed while an import writes; the short busy timeout
    // hands longer waits to retry_on_lock's backoff
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_reference_tables(pool).await?;
    create_scores_table(pool).await?;
    create_personal_bests_table(pool).await?;
    create_orphan_scores_table(pool).await?;
    create_game_stats_table(pool).await?;
    create_imports_table(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_reference_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            game TEXT NOT NULL,
            song_id INTEGER NOT NULL,
            doc TEXT NOT NULL,
            PRIMARY KEY (game, song_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS charts (
            chart_id TEXT PRIMARY KEY,
            game_type TEXT NOT NULL,
            song_id INTEGER NOT NULL,
            doc TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_charts_game_type ON charts(game_type)")
        .execute(pool)
        .await?;

    // Natural keys (hashes, in-game ids) pointing at a chart
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chart_lookup (
            game_type TEXT NOT NULL,
            lookup_key TEXT NOT NULL,
            chart_id TEXT NOT NULL REFERENCES charts(chart_id) ON DELETE CASCADE,
            PRIMARY KEY (game_type, lookup_key)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_scores_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            score_id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            game_type TEXT NOT NULL,
            chart_id TEXT NOT NULL,
            time_added INTEGER NOT NULL,
            doc TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_scores_user_chart ON scores(user_id, chart_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_personal_bests_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS personal_bests (
            user_id INTEGER NOT NULL,
            chart_id TEXT NOT NULL,
            game_type TEXT NOT NULL,
            doc TEXT NOT NULL,
            PRIMARY KEY (user_id, chart_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pbs_user_game_type ON personal_bests(user_id, game_type)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_orphan_scores_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orphan_scores (
            orphan_id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            import_type TEXT NOT NULL,
            time_inserted INTEGER NOT NULL,
            doc TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orphans_user ON orphan_scores(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_game_stats_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_stats (
            user_id INTEGER NOT NULL,
            game_type TEXT NOT NULL,
            doc TEXT NOT NULL,
            PRIMARY KEY (user_id, game_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_imports_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS imports (
            import_id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            time_started INTEGER NOT NULL,
            doc TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
