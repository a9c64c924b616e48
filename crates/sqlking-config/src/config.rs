use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, PoisonError, RwLock},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
    paths::{resolve_path, xdg_config_home, xdg_data_home},
};

const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

/// sqlking configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Path to the SQLite database file.
    /// Supports `$VAR`, `${VAR}` and `~`. SQLKING_DB overrides it.
    /// Default: $XDG_DATA_HOME/sqlking/sqlking.db
    pub db_path: Option<String>,

    /// SQLite journal mode: DELETE, TRUNCATE, PERSIST, MEMORY, WAL or OFF.
    /// Default: WAL
    pub journal_mode: Option<String>,

    /// Whether LIKE compares ASCII letters case-sensitively.
    /// Default: false
    pub case_sensitive_like: Option<bool>,

    /// Milliseconds to wait for a locked database before failing.
    /// Default: 5000
    pub busy_timeout: Option<u64>,

    /// Rows printed by `sqlking query` when no limit is given.
    /// Default: 100
    pub query_limit: Option<u32>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("SQLKING_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("sqlking").join("config.toml"),
    })
});

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .to_path_buf()
}

/// Points [`CONFIG_PATH`] somewhere else, e.g. from a `--config` flag.
pub fn set_config_path(path: impl Into<PathBuf>) {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = path.into();
}

/// Loads the configuration file into [`CONFIG`].
pub fn init() -> Result<()> {
    let config = Config::new()?;
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    Ok(())
}

/// The loaded configuration, or the defaults if [`init`] was never called.
pub fn get_config() -> Config {
    let mut guard = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    guard.get_or_insert_with(Config::default_config).clone()
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            db_path: Some("$XDG_DATA_HOME/sqlking/sqlking.db".into()),
            journal_mode: Some("WAL".into()),
            case_sensitive_like: Some(false),
            busy_timeout: Some(5000),
            query_limit: Some(100),
        }
    }

    /// Reads the configuration file. A missing file yields the defaults.
    pub fn new() -> Result<Self> {
        let config_path = config_path();

        let mut config: Config = match fs::read_to_string(&config_path) {
            Ok(content) => {
                debug!("loading configuration from {}", config_path.display());
                toml::from_str(&content)?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default_config(),
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;
        Ok(config)
    }

    /// Fills unset fields with defaults and validates the rest.
    pub fn resolve(&mut self) -> Result<()> {
        let mode = self
            .journal_mode
            .get_or_insert_with(|| "WAL".into())
            .to_ascii_uppercase();
        if !JOURNAL_MODES.contains(&mode.as_str()) {
            return Err(ConfigError::InvalidJournalMode(mode));
        }
        self.journal_mode = Some(mode);

        if self.query_limit == Some(0) {
            return Err(ConfigError::InvalidQueryLimit(0));
        }

        self.case_sensitive_like.get_or_insert(false);
        self.busy_timeout.get_or_insert(5000);
        self.query_limit.get_or_insert(100);

        Ok(())
    }

    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("SQLKING_DB") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(db_path) = &self.db_path {
            return Ok(resolve_path(db_path)?);
        }
        Ok(xdg_data_home().join("sqlking").join("sqlking.db"))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    /// The configuration as TOML with each key preceded by its documentation.
    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;
        annotate_toml_table::<Config>(doc.as_table_mut(), true);
        Ok(doc)
    }
}

/// Writes an annotated default configuration to [`CONFIG_PATH`].
///
/// Refuses to overwrite an existing file.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(
            config_path.display().to_string(),
        ));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    fn empty_config() -> Config {
        Config {
            db_path: None,
            journal_mode: None,
            case_sensitive_like: None,
            busy_timeout: None,
            query_limit: None,
        }
    }

    #[test]
    fn test_resolve_sets_defaults() {
        let mut config = empty_config();
        config.resolve().unwrap();

        assert_eq!(config.journal_mode.as_deref(), Some("WAL"));
        assert_eq!(config.case_sensitive_like, Some(false));
        assert_eq!(config.busy_timeout, Some(5000));
        assert_eq!(config.query_limit, Some(100));
    }

    #[test]
    fn test_resolve_normalizes_journal_mode() {
        let mut config = empty_config();
        config.journal_mode = Some("delete".into());
        config.resolve().unwrap();
        assert_eq!(config.journal_mode.as_deref(), Some("DELETE"));
    }

    #[test]
    fn test_resolve_rejects_unknown_journal_mode() {
        let mut config = empty_config();
        config.journal_mode = Some("fast".into());
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidJournalMode(mode)) if mode == "FAST"
        ));
    }

    #[test]
    fn test_resolve_rejects_zero_query_limit() {
        let mut config = empty_config();
        config.query_limit = Some(0);
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidQueryLimit(0))
        ));
    }

    #[test]
    fn test_partial_file_parses() {
        let mut config: Config = toml::from_str("journal_mode = \"memory\"").unwrap();
        config.resolve().unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.journal_mode.as_deref(), Some("MEMORY"));
    }

    #[test]
    #[serial]
    fn test_db_path_env_override() {
        with_env(vec![("SQLKING_DB", Some("/custom/app.db"))], || {
            let config = Config::default_config();
            assert_eq!(config.get_db_path().unwrap(), PathBuf::from("/custom/app.db"));
        });
    }

    #[test]
    #[serial]
    fn test_db_path_expands_variables() {
        with_env(
            vec![("SQLKING_DB", None), ("XDG_DATA_HOME", Some("/data"))],
            || {
                let config = Config::default_config();
                assert_eq!(
                    config.get_db_path().unwrap(),
                    PathBuf::from("/data/sqlking/sqlking.db")
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_generate_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        set_config_path(&path);

        let written = generate_default_config().unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# SQLite journal mode"));

        let loaded = Config::new().unwrap();
        assert_eq!(loaded, Config::default_config());

        assert!(matches!(
            generate_default_config(),
            Err(ConfigError::ConfigAlreadyExists(_))
        ));
    }

    #[test]
    #[serial]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        set_config_path(dir.path().join("absent.toml"));

        assert_eq!(Config::new().unwrap(), Config::default_config());
    }

    #[test]
    #[serial]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        set_config_path(dir.path().join("config.toml"));

        let mut config = Config::default_config();
        config.case_sensitive_like = Some(true);
        config.save().unwrap();

        assert_eq!(Config::new().unwrap(), config);
    }
}
