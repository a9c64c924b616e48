//! Error types for sqlking-db.

use miette::Diagnostic;
use thiserror::Error;

/// Database error type for sqlking-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Invalid clause: {0}")]
    #[diagnostic(
        code(sqlking_db::invalid_clause),
        help("IN lists and AND/OR groups need at least one element")
    )]
    InvalidClause(String),

    #[error("Invalid limit: count must be positive (offset {offset}, count {count})")]
    #[diagnostic(
        code(sqlking_db::invalid_limit),
        help("Use a count of at least 1, or leave the limit unset")
    )]
    InvalidLimit { offset: u32, count: u32 },

    #[error("No rows found: {0}")]
    #[diagnostic(
        code(sqlking_db::not_found),
        help("Check the filter, or use `execute` to accept an empty result")
    )]
    NotFound(String),

    #[error("Failed to map column `{column}` of `{table}`: {reason}")]
    #[diagnostic(
        code(sqlking_db::mapping),
        help("The entity definition does not match the queried table")
    )]
    Mapping {
        table: String,
        column: String,
        reason: String,
    },

    #[error("Database query failed: {source}\n  query: {sql}")]
    #[diagnostic(code(sqlking_db::query))]
    Query {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database connection failed for `{path}`: {source}")]
    #[diagnostic(
        code(sqlking_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl DbError {
    pub(crate) fn query(sql: impl Into<String>, source: rusqlite::Error) -> Self {
        DbError::Query {
            sql: sql.into(),
            source,
        }
    }
}

/// Result type alias for sqlking-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
