//! The COUNT query builder.

use rusqlite::types::Value;

use crate::{
    error::{DbError, Result},
    expr::Clause,
    provider::SqlProvider,
    query::{push_joins, push_where, run_query, Statement},
    schema::TableSchema,
    traits::Entity,
};

/// Counts the rows matching an optional clause.
///
/// ```rust,ignore
/// let registered = Count::builder()
///     .filter(users::is_registered.eq(true))
///     .execute::<User>(&provider)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Count {
    joins: Vec<String>,
    clause: Option<Clause>,
}

impl Count {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a JOIN clause, rendered verbatim after `FROM`.
    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.joins.push(join.into());
        self
    }

    /// Sets the WHERE clause, replacing any clause set earlier.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.clause = Some(clause);
        self
    }

    pub fn to_statement(&self, schema: &TableSchema) -> Result<Statement> {
        let mut params = vec![];
        let mut sql = format!("SELECT COUNT(*) FROM {}", schema.table);
        push_joins(&mut sql, &self.joins);
        push_where(&mut sql, &mut params, self.clause.as_ref())?;
        Ok(Statement { sql, params })
    }

    /// Counts rows of the table described by `schema`.
    pub fn fetch_count(self, schema: &TableSchema, provider: &dyn SqlProvider) -> Result<u64> {
        let statement = self.to_statement(schema)?;
        let rows = run_query(provider, &statement)?;

        match rows.first().and_then(|row| row.values().first()) {
            Some(Value::Integer(count)) => Ok(*count as u64),
            _ => Err(DbError::Mapping {
                table: schema.table.clone(),
                column: "COUNT(*)".into(),
                reason: "count query returned no integer".into(),
            }),
        }
    }

    pub fn execute<E: Entity>(self, provider: &dyn SqlProvider) -> Result<u64> {
        self.fetch_count(E::schema(), provider)
    }
}
