//! The INSERT query builder.

use crate::{
    error::Result,
    provider::SqlProvider,
    query::{run_execute, Statement},
    traits::Entity,
};

/// Inserts entities, one statement per entity, with every mapped column.
///
/// ```rust,ignore
/// let inserted = Insert::builder()
///     .value(&clyde)
///     .values(&[gill, josh])
///     .execute(&provider)?;
/// ```
#[derive(Debug, Clone)]
pub struct Insert<'a, E: Entity> {
    entities: Vec<&'a E>,
    or_ignore: bool,
}

impl<'a, E: Entity> Default for Insert<'a, E> {
    fn default() -> Self {
        Self {
            entities: vec![],
            or_ignore: false,
        }
    }
}

impl<'a, E: Entity> Insert<'a, E> {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn value(mut self, entity: &'a E) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn values<I>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = &'a E>,
    {
        self.entities.extend(entities);
        self
    }

    /// Skips rows that violate a uniqueness constraint instead of failing.
    pub fn or_ignore(mut self) -> Self {
        self.or_ignore = true;
        self
    }

    pub fn to_statements(&self) -> Vec<Statement> {
        let schema = E::schema();
        let verb = if self.or_ignore {
            "INSERT OR IGNORE"
        } else {
            "INSERT"
        };

        self.entities
            .iter()
            .map(|entity| {
                let (columns, params): (Vec<_>, Vec<_>) = entity.to_values().into_iter().unzip();
                let placeholders = vec!["?"; params.len()].join(", ");
                let sql = format!(
                    "{} INTO {} ({}) VALUES ({})",
                    verb,
                    schema.table,
                    columns.join(", "),
                    placeholders
                );
                Statement { sql, params }
            })
            .collect()
    }

    /// Runs the inserts in order and returns the number of rows written.
    ///
    /// Stops at the first failing statement; rows written before it stay.
    pub fn execute(self, provider: &dyn SqlProvider) -> Result<usize> {
        let mut inserted = 0;
        for statement in self.to_statements() {
            inserted += run_execute(provider, &statement)?;
        }
        Ok(inserted)
    }
}
