use miette::Diagnostic;
use sqlking_config::error::{ConfigError, PathError};
use sqlking_db::DbError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error("Invalid table or column name `{0}`")]
    #[diagnostic(
        code(sqlking::invalid_identifier),
        help("Names may only contain ASCII letters, digits and underscores")
    )]
    InvalidIdentifier(String),

    #[error("Invalid filter `{0}`")]
    #[diagnostic(
        code(sqlking::invalid_filter),
        help("Use col=v, col!=v, col>v, col>=v, col<v, col<=v or col~pattern")
    )]
    InvalidFilter(String),

    #[error("Invalid IN filter `{0}`")]
    #[diagnostic(code(sqlking::invalid_in_list), help("Use col=v1,v2,..."))]
    InvalidInList(String),

    #[error("Invalid sort key `{0}`")]
    #[diagnostic(code(sqlking::invalid_order), help("Use col, col:asc or col:desc"))]
    InvalidOrder(String),

    #[error("Invalid limit `{0}`")]
    #[diagnostic(code(sqlking::invalid_limit), help("Use offset,count or count"))]
    InvalidLimit(String),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(sqlking::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize configuration: {0}")]
    #[diagnostic(code(sqlking::toml))]
    Toml(#[from] toml::ser::Error),

    #[error("Failed to set up logging: {0}")]
    #[diagnostic(code(sqlking::logging))]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
