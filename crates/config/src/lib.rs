//! Configuration for emojidb.
//!
//! Values are layered, later layers winning:
//!
//! 1. Built-in defaults (database in the platform data directory).
//! 2. A config file: the one passed explicitly, or `config.toml` in the
//!    platform config directory if it exists. TOML, YAML and JSON are
//!    supported, chosen by file extension.
//! 3. Environment variables prefixed with `EMOJIDB_`, nested keys separated
//!    by a double underscore (`EMOJIDB_DATABASE__MAX_CONNECTIONS=8`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use emojidb_cache::Settings;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "EMOJIDB_";
const DATABASE_FILENAME: &str = "emoji.sqlite";
const CONFIG_FILENAME: &str = "config.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "emojidb")
}

/// Default location of the config file, if the platform has one.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    /// How long a writer waits for another writer's lock, in milliseconds.
    pub busy_timeout_ms: u64,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            path: project_dirs()
                .map(|dirs| dirs.data_dir().join(DATABASE_FILENAME))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILENAME)),
            max_connections: settings.max_connections,
            busy_timeout_ms: u64::try_from(settings.busy_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
impl DatabaseConfig {
    pub fn settings(&self) -> Settings {
        Settings {
            max_connections: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

/// Where the emoji dataset comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Absolute path of a JSON file holding the dataset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub source: SourceConfig,
}
impl Config {
    /// Load the configuration from every layer.
    ///
    /// An explicitly passed `file` must exist; the default config file is
    /// only used when it does.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(file)?.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Defaults plus the config file, without the environment layer.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let file = match file {
            Some(file) => Some(file.to_path_buf()),
            None => default_config_file().filter(|path| path.is_file()),
        };
        let Some(file) = file else {
            return Ok(figment);
        };
        if !file.is_file() {
            exn::bail!(ErrorKind::NotFound(file));
        }
        tracing::debug!(file = %file.display(), "Reading config file");
        let extension = file.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file_exact(file)),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(file)),
            Some("json") => figment.merge(Json::file_exact(file)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(file)),
        })
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            exn::bail!(ErrorKind::Invalid("database.max_connections"));
        }
        if self.source.path.as_ref().is_some_and(|path| !path.is_absolute()) {
            exn::bail!(ErrorKind::Invalid("source.path"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_store_settings() {
        let config = Config::from_figment(Config::figment(None).unwrap()).unwrap();
        assert_eq!(config.database.settings(), Settings::default());
        assert!(config.database.path.ends_with(DATABASE_FILENAME));
        assert_eq!(config.source.path, None);
    }

    #[rstest]
    #[case("config.toml", "[database]\nmax_connections = 8\n\n[source]\npath = \"/srv/emoji.json\"\n")]
    #[case("config.yaml", "database:\n  max_connections: 8\nsource:\n  path: /srv/emoji.json\n")]
    #[case("config.json", r#"{"database": {"max_connections": 8}, "source": {"path": "/srv/emoji.json"}}"#)]
    fn test_file_overrides_defaults(#[case] name: &str, #[case] contents: &str) {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, name, contents);
        let config = Config::from_figment(Config::figment(Some(&file)).unwrap()).unwrap();
        assert_eq!(config.database.max_connections, 8);
        // Untouched keys keep their defaults.
        assert_eq!(config.database.busy_timeout_ms, DatabaseConfig::default().busy_timeout_ms);
        assert_eq!(config.source.path, Some(PathBuf::from("/srv/emoji.json")));
    }

    #[test]
    fn test_later_layers_win() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "config.toml", "[database]\nbusy_timeout_ms = 200\n");
        let figment = Config::figment(Some(&file))
            .unwrap()
            .merge(Serialized::default("database.busy_timeout_ms", 5000));
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.database.settings().busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "config.ini", "[database]\n");
        let err = Config::figment(Some(&file)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::figment(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[rstest]
    #[case("[database]\nmax_connections = 0\n", "database.max_connections")]
    #[case("[source]\npath = \"relative/emoji.json\"\n", "source.path")]
    fn test_invalid_values(#[case] contents: &str, #[case] field: &str) {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "config.toml", contents);
        let err = Config::from_figment(Config::figment(Some(&file)).unwrap()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(f) if *f == field));
    }
}
