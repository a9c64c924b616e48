//! Table schema descriptors.
//!
//! A [`TableSchema`] is the mapping collaborator of the query builders: it
//! names the table and lists the mapped columns in declaration order. Entity
//! schemas are built once by [`crate::define_entity!`]; schemas of existing
//! tables can be read back with [`TableSchema::introspect`].

use rusqlite::types::Value;
use tracing::debug;

use crate::{
    error::{DbError, Result},
    provider::SqlProvider,
    traits::Entity,
};

/// Storage class of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
}

impl ColumnType {
    pub const fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BLOB",
        }
    }

    /// Maps a declared SQLite column type to its storage class, following
    /// SQLite's type affinity rules.
    pub fn from_declared(declared: &str) -> Self {
        let declared = declared.to_ascii_uppercase();
        if declared.contains("INT") {
            ColumnType::Integer
        } else if declared.contains("CHAR") || declared.contains("CLOB") || declared.contains("TEXT")
        {
            ColumnType::Text
        } else if declared.is_empty() || declared.contains("BLOB") {
            ColumnType::Blob
        } else {
            ColumnType::Real
        }
    }
}

/// One mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnType,
    pub primary_key: bool,
    pub indexed: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
            primary_key: false,
            indexed: false,
        }
    }

    /// Marks the column as the table's primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Requests a secondary index on the column.
    pub fn index(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// Table name and ordered column definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for this schema.
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                if c.primary_key {
                    format!("{} {} PRIMARY KEY", c.name, c.kind.sql_name())
                } else {
                    format!("{} {}", c.name, c.kind.sql_name())
                }
            })
            .collect::<Vec<_>>();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table,
            columns.join(", ")
        )
    }

    /// One `CREATE INDEX IF NOT EXISTS` statement per indexed column.
    pub fn create_index_sql(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.indexed)
            .map(|c| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {0}_{1}_index ON {0} ({1})",
                    self.table, c.name
                )
            })
            .collect()
    }

    /// Reads the schema of an existing table with `PRAGMA table_info`.
    ///
    /// Fails with [`DbError::NotFound`] if the table does not exist.
    pub fn introspect(provider: &dyn SqlProvider, table: &str) -> Result<Self> {
        let sql = format!("PRAGMA table_info(\"{}\")", table.replace('"', "\"\""));
        let rows = provider
            .query(&sql, &[])
            .map_err(|err| DbError::query(&sql, err))?;

        if rows.is_empty() {
            return Err(DbError::NotFound(format!("table `{table}` does not exist")));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = match row.get("name") {
                Some(Value::Text(name)) => name.clone(),
                _ => {
                    return Err(DbError::Mapping {
                        table: table.to_string(),
                        column: "name".into(),
                        reason: "table_info returned no column name".into(),
                    })
                }
            };
            let declared = match row.get("type") {
                Some(Value::Text(declared)) => declared.as_str(),
                _ => "",
            };

            let mut def = ColumnDef::new(name, ColumnType::from_declared(declared));
            if matches!(row.get("pk"), Some(Value::Integer(pk)) if *pk > 0) {
                def = def.primary_key();
            }
            columns.push(def);
        }

        debug!("introspected {} columns of {}", columns.len(), table);
        Ok(Self::new(table, columns))
    }
}

/// Creates the table and indexes of an entity if they do not exist yet.
pub fn create_table<E: Entity>(provider: &dyn SqlProvider) -> Result<()> {
    let schema = E::schema();
    let statements = std::iter::once(schema.create_table_sql()).chain(schema.create_index_sql());

    for sql in statements {
        debug!("{}", sql);
        provider
            .execute(&sql, &[])
            .map_err(|err| DbError::query(&sql, err))?;
    }

    Ok(())
}
