use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("Path is empty")]
    #[diagnostic(code(sqlking_config::path::empty))]
    Empty,

    #[error("Failed to get current directory: {source}")]
    #[diagnostic(code(sqlking_config::path::current_dir))]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },

    #[error("Unclosed variable expression starting at `{input}`")]
    #[diagnostic(
        code(sqlking_config::path::unclosed_variable),
        help("Close the variable with `}}`")
    )]
    UnclosedVariable { input: String },

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(code(sqlking_config::path::missing_env_var))]
    MissingEnvVar { var: String, input: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(sqlking_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(sqlking_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(sqlking_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Configuration file already exists at {0}")]
    #[diagnostic(
        code(sqlking_config::already_exists),
        help("Remove the existing config file or set SQLKING_CONFIG to another location")
    )]
    ConfigAlreadyExists(String),

    #[error("Invalid journal mode: {0}")]
    #[diagnostic(
        code(sqlking_config::invalid_journal_mode),
        help("Use one of DELETE, TRUNCATE, PERSIST, MEMORY, WAL or OFF")
    )]
    InvalidJournalMode(String),

    #[error("Invalid query limit: {0}")]
    #[diagnostic(
        code(sqlking_config::invalid_query_limit),
        help("query_limit must be at least 1")
    )]
    InvalidQueryLimit(u32),

    #[error("IO error: {0}")]
    #[diagnostic(code(sqlking_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
