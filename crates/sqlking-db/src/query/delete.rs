//! The DELETE query builder.

use crate::{
    error::Result,
    expr::Clause,
    provider::SqlProvider,
    query::{push_where, run_execute, Statement},
    schema::TableSchema,
    traits::Entity,
};

/// Deletes the rows matching a clause. Without a clause every row goes.
#[derive(Debug, Clone, Default)]
pub struct Delete {
    clause: Option<Clause>,
}

impl Delete {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the WHERE clause, replacing any clause set earlier.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.clause = Some(clause);
        self
    }

    pub fn to_statement(&self, schema: &TableSchema) -> Result<Statement> {
        let mut params = vec![];
        let mut sql = format!("DELETE FROM {}", schema.table);
        push_where(&mut sql, &mut params, self.clause.as_ref())?;
        Ok(Statement { sql, params })
    }

    /// Runs the delete and returns the number of removed rows.
    pub fn execute<E: Entity>(self, provider: &dyn SqlProvider) -> Result<usize> {
        let statement = self.to_statement(E::schema())?;
        run_execute(provider, &statement)
    }
}
