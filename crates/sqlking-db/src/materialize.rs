//! Result rows and their conversion into entities.

use std::sync::Arc;

use rusqlite::types::{Value, ValueRef};

use crate::{
    error::{DbError, Result},
    traits::Entity,
};

/// One row returned by a [`crate::SqlProvider`].
///
/// Column names are shared by every row of the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl ResultRow {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of the named column, if the row has it.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Converts provider rows into entities, keeping the provider's row order.
///
/// Every column in `required` must be present in the result set. NULL values
/// and columns the entity does not map leave the field at its default.
pub fn materialize<E: Entity>(rows: Vec<ResultRow>, required: &[String]) -> Result<Vec<E>> {
    let table = &E::schema().table;

    if let Some(first) = rows.first() {
        if let Some(missing) = required.iter().find(|c| !first.columns().contains(c)) {
            return Err(DbError::Mapping {
                table: table.clone(),
                column: missing.clone(),
                reason: "column is missing from the result set".into(),
            });
        }
    }

    rows.iter()
        .map(|row| {
            let mut entity = E::default();
            for (column, value) in row.iter() {
                if matches!(value, Value::Null) {
                    continue;
                }
                entity
                    .set_field(column, ValueRef::from(value))
                    .map_err(|err| DbError::Mapping {
                        table: table.clone(),
                        column: column.to_string(),
                        reason: err.to_string(),
                    })?;
            }
            Ok(entity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::User;

    fn row(columns: &[&str], values: Vec<Value>) -> ResultRow {
        let columns: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
        ResultRow::new(columns, values)
    }

    #[test]
    fn test_materialize_assigns_mapped_fields() {
        let rows = vec![row(
            &["id", "username", "timestamp", "isRegistered"],
            vec![
                Value::Integer(1),
                Value::Text("clyde".into()),
                Value::Integer(1000),
                Value::Integer(1),
            ],
        )];

        let users: Vec<User> = materialize(rows, &[]).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].username, "clyde");
        assert_eq!(users[0].timestamp, 1000);
        assert!(users[0].is_registered);
    }

    #[test]
    fn test_null_and_unmapped_columns_keep_defaults() {
        let rows = vec![row(
            &["username", "timestamp", "extra"],
            vec![
                Value::Text("angie".into()),
                Value::Null,
                Value::Text("ignored".into()),
            ],
        )];

        let users: Vec<User> = materialize(rows, &[]).unwrap();
        assert_eq!(users[0].username, "angie");
        assert_eq!(users[0].timestamp, 0);
        assert_eq!(users[0].id, 0);
        assert!(!users[0].is_registered);
    }

    #[test]
    fn test_missing_required_column() {
        let rows = vec![row(&["username"], vec![Value::Text("gill".into())])];

        let result = materialize::<User>(rows, &["username".into(), "timestamp".into()]);
        match result {
            Err(DbError::Mapping { column, .. }) => assert_eq!(column, "timestamp"),
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_is_mapping_error() {
        let rows = vec![row(&["timestamp"], vec![Value::Text("later".into())])];

        let result = materialize::<User>(rows, &[]);
        assert!(matches!(result, Err(DbError::Mapping { .. })));
    }

    #[test]
    fn test_row_order_is_preserved() {
        let rows = ["josh", "angie", "gill"]
            .iter()
            .map(|name| row(&["username"], vec![Value::Text(name.to_string())]))
            .collect();

        let users: Vec<User> = materialize(rows, &[]).unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["josh", "angie", "gill"]);
    }

    #[test]
    fn test_empty_result() {
        let users: Vec<User> = materialize(vec![], &["username".into()]).unwrap();
        assert!(users.is_empty());
    }
}
