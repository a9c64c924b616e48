//! A small ORM and query builder for embedded SQLite.
//!
//! Filters are built as [`Clause`] trees, usually through the typed column
//! constants generated by [`define_entity!`]. Query builders compile them into
//! parameterized SQL, run it through a [`SqlProvider`] and map the rows back
//! onto entities.

pub mod error;
pub mod expr;
pub mod macros;
pub mod materialize;
pub mod provider;
pub mod query;
pub mod schema;
pub mod traits;

#[cfg(test)]
mod test_utils;

pub use rusqlite;

pub use error::{DbError, Result};
pub use expr::{Clause, Col, Connective, Exp};
pub use materialize::{materialize, ResultRow};
pub use provider::{ConnectionOptions, SqlProvider, SqliteProvider};
pub use query::*;
pub use schema::{create_table, ColumnDef, ColumnType, TableSchema};
pub use traits::{Entity, SqlType};
