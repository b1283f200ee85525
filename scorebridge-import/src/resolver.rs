//! Song and chart reference lookup
//!
//! The pipeline only reads reference data. Charts are found through natural
//! keys (hashes, in-game ids, titles) registered when the chart is stored.

use async_trait::async_trait;
use scorebridge_common::models::{ChartRef, SongRef};
use scorebridge_common::{Game, GameType, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// Natural key identifying a chart within a game-type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChartKey {
    #[serde(rename_all = "camelCase")]
    ChartId {
        chart_id: String,
    },
    /// In-game song id plus difficulty; `version` narrows to one game release
    #[serde(rename_all = "camelCase")]
    InGameId {
        in_game_id: i64,
        difficulty: String,
        #[serde(default)]
        version: Option<String>,
    },
    Sha256 {
        hash: String,
    },
    Md5 {
        hash: String,
    },
    Title {
        title: String,
        difficulty: String,
    },
}

impl ChartKey {
    /// Key string stored in `chart_lookup`
    ///
    /// Hashes are case-folded; titles are matched exactly.
    pub fn lookup_key(&self) -> String {
        match self {
            ChartKey::ChartId { chart_id } => format!("id:{}", chart_id),
            ChartKey::InGameId {
                in_game_id,
                difficulty,
                version,
            } => format!(
                "igid:{}:{}:{}",
                in_game_id,
                difficulty,
                version.as_deref().unwrap_or("*")
            ),
            ChartKey::Sha256 { hash } => format!("sha256:{}", hash.to_lowercase()),
            ChartKey::Md5 { hash } => format!("md5:{}", hash.to_lowercase()),
            ChartKey::Title { title, difficulty } => format!("title:{}:{}", title, difficulty),
        }
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKey::ChartId { chart_id } => write!(f, "chartID {}", chart_id),
            ChartKey::InGameId {
                in_game_id,
                difficulty,
                version: Some(v),
            } => write!(f, "in-game id {} ({} for {})", in_game_id, difficulty, v),
            ChartKey::InGameId {
                in_game_id,
                difficulty,
                version: None,
            } => write!(f, "in-game id {} ({})", in_game_id, difficulty),
            ChartKey::Sha256 { hash } => write!(f, "sha256 {}", hash),
            ChartKey::Md5 { hash } => write!(f, "md5 {}", hash),
            ChartKey::Title { title, difficulty } => write!(f, "title '{}' ({})", title, difficulty),
        }
    }
}

/// Read-only song/chart lookup
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    async fn find_chart(&self, game_type: GameType, key: &ChartKey) -> Result<Option<ChartRef>>;

    async fn find_song(&self, game: Game, song_id: i64) -> Result<Option<SongRef>>;
}

/// Chart plus the natural keys it is found by
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartEntry {
    #[serde(flatten)]
    pub chart: ChartRef,
    #[serde(default)]
    pub keys: Vec<ChartKey>,
}

/// Reference data file format loaded by the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceBundle {
    #[serde(default)]
    pub songs: Vec<SongRef>,
    #[serde(default)]
    pub charts: Vec<ChartEntry>,
}

// ============================================================================
// SQLite
// ============================================================================

/// Reference store backed by the `songs`, `charts` and `chart_lookup` tables
#[derive(Clone)]
pub struct SqliteReferenceStore {
    pool: SqlitePool,
}

impl SqliteReferenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_song(&self, song: &SongRef) -> Result<()> {
        let doc = serde_json::to_string(song)?;

        sqlx::query(
            r#"
            INSERT INTO songs (game, song_id, doc) VALUES (?, ?, ?)
            ON CONFLICT(game, song_id) DO UPDATE SET doc = excluded.doc
            "#,
        )
        .bind(song.game.as_str())
        .bind(song.song_id)
        .bind(doc)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a chart and register its lookup keys in one transaction
    pub async fn insert_chart(&self, chart: &ChartRef, keys: &[ChartKey]) -> Result<()> {
        let doc = serde_json::to_string(chart)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO charts (chart_id, game_type, song_id, doc) VALUES (?, ?, ?, ?)
            ON CONFLICT(chart_id) DO UPDATE SET
                game_type = excluded.game_type,
                song_id = excluded.song_id,
                doc = excluded.doc
            "#,
        )
        .bind(&chart.chart_id)
        .bind(chart.game_type.as_str())
        .bind(chart.song_id)
        .bind(&doc)
        .execute(&mut *tx)
        .await?;

        for key in keys {
            sqlx::query(
                "INSERT OR REPLACE INTO chart_lookup (game_type, lookup_key, chart_id) VALUES (?, ?, ?)",
            )
            .bind(chart.game_type.as_str())
            .bind(key.lookup_key())
            .bind(&chart.chart_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            chart_id = %chart.chart_id,
            game_type = %chart.game_type,
            keys = keys.len(),
            "Stored chart reference"
        );

        Ok(())
    }

    /// Load every song and chart of a bundle; returns (songs, charts) stored
    pub async fn load_bundle(&self, bundle: &ReferenceBundle) -> Result<(usize, usize)> {
        for song in &bundle.songs {
            self.insert_song(song).await?;
        }
        for entry in &bundle.charts {
            self.insert_chart(&entry.chart, &entry.keys).await?;
        }
        Ok((bundle.songs.len(), bundle.charts.len()))
    }

    /// Bulk maintenance over every chart of a game-type
    ///
    /// `mutate` returns true when it changed the chart; only those are written
    /// back. All writes commit together.
    pub async fn mutate_charts<F>(&self, game_type: GameType, mut mutate: F) -> Result<usize>
    where
        F: FnMut(&mut ChartRef) -> bool + Send,
    {
        let mut tx = self.pool.begin().await?;

        let docs: Vec<String> = sqlx::query_scalar("SELECT doc FROM charts WHERE game_type = ?")
            .bind(game_type.as_str())
            .fetch_all(&mut *tx)
            .await?;

        let mut changed = 0usize;
        for doc in docs {
            let mut chart: ChartRef = serde_json::from_str(&doc)?;
            if !mutate(&mut chart) {
                continue;
            }

            sqlx::query("UPDATE charts SET doc = ? WHERE chart_id = ?")
                .bind(serde_json::to_string(&chart)?)
                .bind(&chart.chart_id)
                .execute(&mut *tx)
                .await?;
            changed += 1;
        }

        tx.commit().await?;

        tracing::info!(game_type = %game_type, changed, "Chart maintenance applied");
        Ok(changed)
    }
}

#[async_trait]
impl ReferenceResolver for SqliteReferenceStore {
    async fn find_chart(&self, game_type: GameType, key: &ChartKey) -> Result<Option<ChartRef>> {
        let doc: Option<String> = match key {
            ChartKey::ChartId { chart_id } => {
                sqlx::query_scalar("SELECT doc FROM charts WHERE chart_id = ? AND game_type = ?")
                    .bind(chart_id)
                    .bind(game_type.as_str())
                    .fetch_optional(&self.pool)
                    .await?
            }
            _ => {
                sqlx::query_scalar(
                    r#"
                    SELECT c.doc FROM chart_lookup l
                    JOIN charts c ON c.chart_id = l.chart_id
                    WHERE l.game_type = ? AND l.lookup_key = ?
                    "#,
                )
                .bind(game_type.as_str())
                .bind(key.lookup_key())
                .fetch_optional(&self.pool)
                .await?
            }
        };

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn find_song(&self, game: Game, song_id: i64) -> Result<Option<SongRef>> {
        let doc: Option<String> =
            sqlx::query_scalar("SELECT doc FROM songs WHERE game = ? AND song_id = ?")
                .bind(game.as_str())
                .bind(song_id)
                .fetch_optional(&self.pool)
                .await?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Reference store held in memory; used by tests and dry runs
#[derive(Default)]
pub struct InMemoryReferenceStore {
    songs: RwLock<HashMap<(Game, i64), SongRef>>,
    charts: RwLock<HashMap<String, ChartRef>>,
    keys: RwLock<HashMap<(GameType, String), String>>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_song(&self, song: SongRef) {
        self.songs
            .write()
            .await
            .insert((song.game, song.song_id), song);
    }

    pub async fn insert_chart(&self, chart: ChartRef, keys: &[ChartKey]) {
        let mut key_map = self.keys.write().await;
        for key in keys {
            key_map.insert((chart.game_type, key.lookup_key()), chart.chart_id.clone());
        }
        self.charts
            .write()
            .await
            .insert(chart.chart_id.clone(), chart);
    }
}

#[async_trait]
impl ReferenceResolver for InMemoryReferenceStore {
    async fn find_chart(&self, game_type: GameType, key: &ChartKey) -> Result<Option<ChartRef>> {
        let chart_id = match key {
            ChartKey::ChartId { chart_id } => Some(chart_id.clone()),
            _ => self
                .keys
                .read()
                .await
                .get(&(game_type, key.lookup_key()))
                .cloned(),
        };

        let Some(chart_id) = chart_id else {
            return Ok(None);
        };

        Ok(self
            .charts
            .read()
            .await
            .get(&chart_id)
            .filter(|c| c.game_type == game_type)
            .cloned())
    }

    async fn find_song(&self, game: Game, song_id: i64) -> Result<Option<SongRef>> {
        Ok(self.songs.read().await.get(&(game, song_id)).cloned())
    }
}
