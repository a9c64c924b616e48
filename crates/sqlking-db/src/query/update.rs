//! The UPDATE query builder.

use rusqlite::types::Value;

use crate::{
    error::{DbError, Result},
    expr::Clause,
    provider::SqlProvider,
    query::{push_where, run_execute, Statement},
    schema::TableSchema,
    traits::Entity,
};

/// Updates columns of the rows matching an optional clause.
///
/// ```rust,ignore
/// let updated = Update::builder()
///     .set(users::is_registered, true)
///     .filter(users::username.eq("josh".to_string()))
///     .execute::<User>(&provider)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Update {
    assignments: Vec<(String, Value)>,
    clause: Option<Clause>,
}

impl Update {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a `column = value` assignment.
    pub fn set(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.assignments
            .push((column.as_ref().to_string(), value.into()));
        self
    }

    /// Sets the WHERE clause, replacing any clause set earlier.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.clause = Some(clause);
        self
    }

    pub fn to_statement(&self, schema: &TableSchema) -> Result<Statement> {
        if self.assignments.is_empty() {
            return Err(DbError::InvalidClause(
                "UPDATE needs at least one assignment".into(),
            ));
        }

        let sets = self
            .assignments
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>();
        let mut params = self
            .assignments
            .iter()
            .map(|(_, value)| value.clone())
            .collect::<Vec<_>>();

        let mut sql = format!("UPDATE {} SET {}", schema.table, sets.join(", "));
        push_where(&mut sql, &mut params, self.clause.as_ref())?;

        Ok(Statement { sql, params })
    }

    /// Runs the update and returns the number of changed rows.
    pub fn execute<E: Entity>(self, provider: &dyn SqlProvider) -> Result<usize> {
        let statement = self.to_statement(E::schema())?;
        run_execute(provider, &statement)
    }
}
