//! scorebridge-import - command-line front end for the score import pipeline
//!
//! Imports score files, replays orphaned submissions and maintains the
//! reference data the converters resolve charts against.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scorebridge_common::config::{Settings, TomlConfig};
use scorebridge_common::db::init_database;
use scorebridge_common::models::{TierlistValue, UserId};
use scorebridge_common::{GameType, ImportType};
use scorebridge_import::converters::batch_manual;
use scorebridge_import::resolver::ReferenceBundle;
use scorebridge_import::{orphans, ScoreImporter, ScoreStore, SqliteReferenceStore, TracingSink};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for scorebridge-import
#[derive(Parser, Debug)]
#[command(name = "scorebridge-import")]
#[command(about = "Import rhythm game scores into scorebridge")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the per-user scorebridge.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root folder holding the database
    #[arg(short, long, global = true, env = "SCOREBRIDGE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Database file, overriding the root folder default
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a file of scores
    Import {
        /// Import type, e.g. file/batch-manual or ir/beatoraja
        #[arg(short = 't', long = "type", value_parser = parse_import_type)]
        import_type: ImportType,

        #[arg(short, long)]
        user: UserId,

        /// JSON file: a batch-manual document, or one item or an array of items
        #[arg(short, long)]
        file: PathBuf,

        /// Context JSON for non-file import types
        #[arg(long)]
        context: Option<String>,
    },

    /// Retry every orphaned score of a user
    ReprocessOrphans {
        #[arg(short, long)]
        user: UserId,
    },

    /// Print a user's orphaned scores
    ListOrphans {
        #[arg(short, long)]
        user: UserId,
    },

    /// Load a songs/charts reference bundle
    LoadReference {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Set tier-list values on charts of one game-type
    ApplyTiers {
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn parse_import_type(s: &str) -> std::result::Result<ImportType, String> {
    ImportType::ALL
        .iter()
        .copied()
        .find(|t| t.as_str() == s)
        .ok_or_else(|| format!("unknown import type '{}'", s))
}

/// Tier values keyed by chart id, then tier name
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TierFile {
    game_type: GameType,
    tiers: BTreeMap<String, BTreeMap<String, Option<f64>>>,
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Split an import file into the shared context and the items to import
fn import_items(
    import_type: ImportType,
    file: Value,
    context: Option<&str>,
) -> Result<(Value, Vec<Value>)> {
    if import_type == ImportType::BatchManual {
        if context.is_some() {
            bail!("batch-manual files carry their own context");
        }
        return Ok(batch_manual::parse_file(&file)?);
    }

    let mut context: Value = match context {
        Some(raw) => serde_json::from_str(raw).context("Invalid --context JSON")?,
        None => Value::Object(Default::default()),
    };
    if let Value::Object(map) = &mut context {
        map.entry("timeReceived")
            .or_insert_with(|| chrono::Utc::now().timestamp_millis().into());
    }

    let items = match file {
        Value::Array(items) => items,
        item => vec![item],
    };
    Ok((context, items))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())?;
    let settings = Settings::resolve(
        toml_config,
        args.root_folder.as_deref(),
        args.database.as_deref(),
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scorebridge-import v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", settings.database_path.display());

    let pool = init_database(&settings.database_path)
        .await
        .context("Failed to open database")?;
    let references = SqliteReferenceStore::new(pool.clone());
    let store = ScoreStore::new(pool, settings.import.max_lock_wait_ms);
    let diag = TracingSink;

    match args.command {
        Command::Import {
            import_type,
            user,
            file,
            context,
        } => {
            let (context, items) = import_items(import_type, read_json(&file)?, context.as_deref())?;
            let importer = ScoreImporter::new(Arc::new(references), store, settings.import);

            let doc = importer
                .import_batch(user, import_type, &items, &context, &diag)
                .await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }

        Command::ReprocessOrphans { user } => {
            let importer = ScoreImporter::new(Arc::new(references), store, settings.import);
            let summary = orphans::reprocess_orphans(&importer, user, &diag).await?;
            println!(
                "resolved {}, unresolved {}, discarded {}, already consumed {}, failed {}",
                summary.resolved,
                summary.unresolved,
                summary.discarded,
                summary.already_consumed,
                summary.internal_failures
            );
        }

        Command::ListOrphans { user } => {
            let records = orphans::list_orphans(&store, user).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Command::LoadReference { file } => {
            let bundle: ReferenceBundle = serde_json::from_value(read_json(&file)?)
                .context("Invalid reference bundle")?;
            let (songs, charts) = references.load_bundle(&bundle).await?;
            info!(songs, charts, "Reference data loaded");
        }

        Command::ApplyTiers { file } => {
            let tiers: TierFile =
                serde_json::from_value(read_json(&file)?).context("Invalid tier file")?;

            let changed = references
                .mutate_charts(tiers.game_type, |chart| {
                    let Some(values) = tiers.tiers.get(&chart.chart_id) else {
                        return false;
                    };
                    let mut changed = false;
                    for (tier, value) in values {
                        let new = TierlistValue {
                            value: *value,
                            text: None,
                        };
                        if chart.tierlist.get(tier) != Some(&new) {
                            chart.tierlist.insert(tier.clone(), new);
                            changed = true;
                        }
                    }
                    changed
                })
                .await?;
            info!(changed, game_type = %tiers.game_type, "Tier values applied");
        }
    }

    Ok(())
}
