//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from an optional `scorebridge.toml`. Everything has
//! a built-in default, so a missing file is not an error unless the caller
//! named one explicitly.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "SCOREBRIDGE_ROOT_FOLDER";

/// Default database file name inside the root folder
pub const DEFAULT_DATABASE_FILE: &str = "scorebridge.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// SQLite database path; relative paths are taken from the root folder
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub import: ImportSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Import pipeline tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ImportSettings {
    /// Maximum items of one import converted at once
    #[serde(default = "default_item_concurrency")]
    pub item_concurrency: usize,

    /// Maximum orphans replayed at once
    #[serde(default = "default_orphan_concurrency")]
    pub orphan_concurrency: usize,

    /// Total time a store write may spend retrying on a locked database
    #[serde(default = "default_max_lock_wait_ms")]
    pub max_lock_wait_ms: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            item_concurrency: default_item_concurrency(),
            orphan_concurrency: default_orphan_concurrency(),
            max_lock_wait_ms: default_max_lock_wait_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_item_concurrency() -> usize {
    16
}

fn default_orphan_concurrency() -> usize {
    8
}

fn default_max_lock_wait_ms() -> u64 {
    5000
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        if config.import.orphan_concurrency == 0 || config.import.item_concurrency == 0 {
            return Err(Error::Config(
                "import.orphan_concurrency and import.item_concurrency must be at least 1"
                    .to_string(),
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load an explicitly named file, else the per-user file if present,
    /// else built-in defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading default config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Per-user config file location (`<config dir>/scorebridge/scorebridge.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scorebridge").join("scorebridge.toml"))
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// OS-dependent default root folder
pub fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("scorebridge"))
        .unwrap_or_else(|| PathBuf::from("./scorebridge_data"))
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub logging: LoggingConfig,
    pub import: ImportSettings,
}

impl Settings {
    /// Combine the TOML file with command-line overrides
    pub fn resolve(
        toml_config: TomlConfig,
        cli_root: Option<&Path>,
        cli_database: Option<&Path>,
    ) -> Self {
        let root_folder = resolve_root_folder(cli_root, ROOT_FOLDER_ENV, &toml_config);

        let database_path = match (cli_database, &toml_config.database_path) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) if path.is_absolute() => path.clone(),
            (None, Some(path)) => root_folder.join(path),
            (None, None) => root_folder.join(DEFAULT_DATABASE_FILE),
        };

        Settings {
            root_folder,
            database_path,
            logging: toml_config.logging,
            import: toml_config.import,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.import.orphan_concurrency, 8);
        assert!(config.import.item_concurrency >= 1);
        assert_eq!(config.import.max_lock_wait_ms, 5000);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let config = TomlConfig::from_toml_str(
            r#"
            root_folder = "/srv/scorebridge"
            database_path = "data/scores.db"

            [logging]
            level = "debug"

            [import]
            orphan_concurrency = 2
            item_concurrency = 4
            max_lock_wait_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.import.orphan_concurrency, 2);
        assert_eq!(config.import.item_concurrency, 4);
        assert_eq!(config.import.max_lock_wait_ms, 250);
        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/scorebridge")));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = TomlConfig::from_toml_str("[import]\norphan_concurrency = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    #[serial]
    fn test_root_folder_priority() {
        let toml_config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };

        std::env::set_var(ROOT_FOLDER_ENV, "/from/env");
        assert_eq!(
            resolve_root_folder(Some(Path::new("/from/cli")), ROOT_FOLDER_ENV, &toml_config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            resolve_root_folder(None, ROOT_FOLDER_ENV, &toml_config),
            PathBuf::from("/from/env")
        );

        std::env::remove_var(ROOT_FOLDER_ENV);
        assert_eq!(
            resolve_root_folder(None, ROOT_FOLDER_ENV, &toml_config),
            PathBuf::from("/from/toml")
        );
        assert_eq!(
            resolve_root_folder(None, ROOT_FOLDER_ENV, &TomlConfig::default()),
            get_default_root_folder()
        );
    }

    #[test]
    #[serial]
    fn test_database_path_resolution() {
        std::env::remove_var(ROOT_FOLDER_ENV);
        let root = Path::new("/root-folder");

        let settings = Settings::resolve(TomlConfig::default(), Some(root), None);
        assert_eq!(settings.database_path, root.join(DEFAULT_DATABASE_FILE));

        let relative = TomlConfig {
            database_path: Some(PathBuf::from("x.db")),
            ..Default::default()
        };
        let settings = Settings::resolve(relative, Some(root), None);
        assert_eq!(settings.database_path, root.join("x.db"));

        let settings = Settings::resolve(
            TomlConfig::default(),
            Some(root),
            Some(Path::new("/elsewhere/y.db")),
        );
        assert_eq!(settings.database_path, PathBuf::from("/elsewhere/y.db"));
    }
}
