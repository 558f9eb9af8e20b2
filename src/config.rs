//! Versioned TOML configuration. Every key is optional; a missing file means
//! "use the defaults", which keep all state under `~/.book-inventory/`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::Level;

use crate::db::{data_dir, default_db_path, FilterMode};

const CONFIG_VERSION: i64 = 1;
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "book-inventory.log";
/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "BOOK_INVENTORY_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: Option<i64>,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Storage {
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ui {
    #[serde(default)]
    pub filter_mode: FilterMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Log {
    pub level: Option<String>,
    pub path: Option<PathBuf>,
}

impl Config {
    /// `$BOOK_INVENTORY_CONFIG`, or `config.toml` in the data directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(data_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(version) = self.version {
            if version != CONFIG_VERSION {
                bail!("unsupported config version {version}; expected version = {CONFIG_VERSION}");
            }
        }
        if let Some(path) = &self.storage.db_path {
            if path.as_os_str().is_empty() {
                bail!("storage.db_path must not be empty");
            }
        }
        self.log_level()?;
        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(LOG_FILE_NAME)),
        }
    }

    pub fn log_level(&self) -> Result<Level> {
        match &self.log.level {
            Some(level) => level
                .parse::<Level>()
                .with_context(|| format!("unknown log level `{level}`")),
            None => Ok(Level::INFO),
        }
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.ui.filter_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() -> Result<()> {
        let config = Config::parse("")?;
        assert_eq!(config.filter_mode(), FilterMode::Search);
        assert_eq!(config.log_level()?, Level::INFO);
        assert!(config.storage.db_path.is_none());
        Ok(())
    }

    #[test]
    fn parses_every_section() -> Result<()> {
        let config = Config::parse(
            r#"
            version = 1

            [storage]
            db_path = "/tmp/books.db"

            [ui]
            filter_mode = "sql"

            [log]
            level = "debug"
            path = "/tmp/books.log"
            "#,
        )?;
        assert_eq!(config.db_path()?, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.filter_mode(), FilterMode::Sql);
        assert_eq!(config.log_level()?, Level::DEBUG);
        assert_eq!(config.log_path()?, PathBuf::from("/tmp/books.log"));
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::parse("version = 7").is_err());
        assert!(Config::parse("[ui]\nfilter_mode = \"regex\"").is_err());
        assert!(Config::parse("[log]\nlevel = \"loud\"").is_err());
        assert!(Config::parse("[storage]\ndb_path = \"\"").is_err());
        assert!(Config::parse("[storage]\nunknown = 1").is_err());
    }

    #[test]
    fn missing_file_loads_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::load(&dir.path().join("absent.toml"))?;
        assert_eq!(config.filter_mode(), FilterMode::Search);
        Ok(())
    }

    #[test]
    fn load_reads_file_from_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui]\nfilter_mode = \"sql\"\n")?;
        assert_eq!(Config::load(&path)?.filter_mode(), FilterMode::Sql);
        Ok(())
    }
}
