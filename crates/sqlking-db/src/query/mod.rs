//! The query builders.
//!
//! Each statement type has its own builder with chainable methods. Builders
//! are plain values: they take a [`Clause`] tree, compile it when the statement
//! is built, and hand SQL text plus positional arguments to a
//! [`SqlProvider`].
//!
//! - [`Select`]: `SELECT` with projection, JOIN, WHERE, ORDER BY and LIMIT.
//! - [`Count`]: `SELECT COUNT(*)` with JOIN and WHERE.
//! - [`Insert`]: `INSERT INTO` from entity values.
//! - [`Update`]: `UPDATE ... SET` with WHERE.
//! - [`Delete`]: `DELETE FROM` with WHERE.
//!
//! Every `filter` call replaces the previous clause. Combine conditions with
//! [`Clause::and`] / [`Clause::or`] instead of calling `filter` twice.

use rusqlite::types::Value;
use tracing::{debug, trace};

use crate::{
    error::{DbError, Result},
    expr::{compile, Clause},
    materialize::ResultRow,
    provider::SqlProvider,
};

pub mod count;
pub mod delete;
pub mod insert;
pub mod order;
pub mod select;
pub mod update;

pub use count::Count;
pub use delete::Delete;
pub use insert::Insert;
pub use order::{LimitSpec, Order, OrderSpec};
pub use select::Select;
pub use update::Update;

/// Final SQL text and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

fn push_joins(sql: &mut String, joins: &[String]) {
    for join in joins {
        sql.push(' ');
        sql.push_str(join);
    }
}

/// Appends ` WHERE <fragment>` when a clause is set.
fn push_where(sql: &mut String, params: &mut Vec<Value>, clause: Option<&Clause>) -> Result<()> {
    if let Some(clause) = clause {
        let fragment = compile(clause)?;
        sql.push_str(" WHERE ");
        sql.push_str(&fragment.sql);
        params.extend(fragment.args);
    }
    Ok(())
}

fn run_query<P: SqlProvider + ?Sized>(provider: &P, statement: &Statement) -> Result<Vec<ResultRow>> {
    debug!("{}", statement.sql);
    let rows = provider
        .query(&statement.sql, &statement.params)
        .map_err(|err| DbError::query(&statement.sql, err))?;
    trace!("{} rows returned", rows.len());
    Ok(rows)
}

fn run_execute<P: SqlProvider + ?Sized>(provider: &P, statement: &Statement) -> Result<usize> {
    debug!("{}", statement.sql);
    let affected = provider
        .execute(&statement.sql, &statement.params)
        .map_err(|err| DbError::query(&statement.sql, err))?;
    trace!("{} rows affected", affected);
    Ok(affected)
}
