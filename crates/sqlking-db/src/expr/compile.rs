//! Clause compilation.
//!
//! Walks a [`Clause`] tree post-order and produces a SQL fragment with `?`
//! placeholders together with the values to bind, in placeholder order.

use rusqlite::types::Value;

use crate::{
    error::{DbError, Result},
    expr::clause::Clause,
};

/// A compiled WHERE fragment and its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Compiles a clause tree into a [`Fragment`].
///
/// Fails with [`DbError::InvalidClause`] when an `IN` list or a group is empty.
pub fn compile(clause: &Clause) -> Result<Fragment> {
    let mut args = Vec::new();
    let sql = write_clause(clause, &mut args)?;
    Ok(Fragment { sql, args })
}

fn write_clause(clause: &Clause, args: &mut Vec<Value>) -> Result<String> {
    match clause {
        Clause::Comparison { column, exp, value } => {
            args.push(value.clone());
            Ok(format!("{} {} ?", column, exp.symbol()))
        }
        Clause::InList { column, values } => {
            if values.is_empty() {
                return Err(DbError::InvalidClause(format!(
                    "IN list for `{column}` has no values"
                )));
            }
            let placeholders = vec!["?"; values.len()].join(", ");
            args.extend(values.iter().cloned());
            Ok(format!("{} IN ({})", column, placeholders))
        }
        Clause::Group {
            connective,
            children,
        } => {
            if children.is_empty() {
                return Err(DbError::InvalidClause(format!(
                    "{connective:?} group has no clauses"
                )));
            }
            let parts = children
                .iter()
                .map(|child| write_clause(child, args))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("({})", parts.join(connective.separator())))
        }
    }
}

impl Clause {
    /// Compiles this clause. See [`compile`].
    pub fn compile(&self) -> Result<Fragment> {
        compile(self)
    }
}
