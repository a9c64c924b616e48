//! SQL execution providers.
//!
//! Query builders never talk to SQLite directly. They hand the final SQL text
//! and positional arguments to a [`SqlProvider`], which binds and runs them.
//! [`SqliteProvider`] is the rusqlite-backed implementation.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use rusqlite::{params_from_iter, types::Value, Connection};
use tracing::debug;

use crate::{
    error::{DbError, Result},
    materialize::ResultRow,
};

/// Executes parameterized SQL.
///
/// Implementations bind `params` to the `?` placeholders in order and must not
/// rewrite or escape the SQL text.
pub trait SqlProvider {
    /// Runs a statement that returns rows.
    fn query(&self, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<ResultRow>>;

    /// Runs a statement that does not return rows and reports the number of
    /// affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> rusqlite::Result<usize>;
}

impl<P: SqlProvider + ?Sized> SqlProvider for &P {
    fn query(&self, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<ResultRow>> {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> rusqlite::Result<usize> {
        (**self).execute(sql, params)
    }
}

/// Connection settings applied by [`SqliteProvider::configure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// `PRAGMA journal_mode`, e.g. `WAL` or `DELETE`.
    pub journal_mode: Option<String>,
    /// `PRAGMA case_sensitive_like`
    pub case_sensitive_like: bool,
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            journal_mode: Some("WAL".into()),
            case_sensitive_like: false,
            busy_timeout: Some(Duration::from_millis(5000)),
        }
    }
}

/// A shared SQLite connection.
///
/// Cloning is cheap; all clones use the same connection, and statements are
/// serialized by its mutex.
#[derive(Clone)]
pub struct SqliteProvider {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProvider {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DbError::Connection {
            path: path.display().to_string(),
            source,
        })?;
        debug!("opened database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Connection {
            path: ":memory:".into(),
            source,
        })?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Applies connection pragmas.
    pub fn configure(&self, options: &ConnectionOptions) -> Result<()> {
        let conn = self.lock();
        let path = conn.path().unwrap_or(":memory:").to_string();
        let wrap = |source: rusqlite::Error| DbError::Connection {
            path: path.clone(),
            source,
        };

        if let Some(mode) = &options.journal_mode {
            // journal_mode reports the resulting mode as a row
            let applied: String = conn
                .query_row(&format!("PRAGMA journal_mode = {mode}"), [], |row| {
                    row.get(0)
                })
                .map_err(wrap)?;
            debug!("journal_mode = {}", applied);
        }

        let case_sensitive = if options.case_sensitive_like {
            "ON"
        } else {
            "OFF"
        };
        conn.execute_batch(&format!("PRAGMA case_sensitive_like = {case_sensitive};"))
            .map_err(wrap)?;

        if let Some(timeout) = options.busy_timeout {
            conn.busy_timeout(timeout).map_err(wrap)?;
        }

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock does not leave the connection unusable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SqlProvider for SqliteProvider {
    fn query(&self, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<ResultRow>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            (0..width)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?;

        let mut result = Vec::new();
        for values in rows {
            result.push(ResultRow::new(columns.clone(), values?));
        }
        Ok(result)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> rusqlite::Result<usize> {
        let conn = self.lock();
        conn.execute(sql, params_from_iter(params.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_returns_named_columns() {
        let provider = SqliteProvider::open_in_memory().unwrap();
        provider
            .execute("CREATE TABLE t (a INTEGER, b TEXT)", &[])
            .unwrap();
        provider
            .execute(
                "INSERT INTO t (a, b) VALUES (?, ?)",
                &[Value::Integer(7), Value::Text("seven".into())],
            )
            .unwrap();

        let rows = provider
            .query("SELECT a, b FROM t WHERE a = ?", &[Value::Integer(7)])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some(&Value::Integer(7)));
        assert_eq!(rows[0].get("b"), Some(&Value::Text("seven".into())));
    }

    #[test]
    fn test_provider_error_passes_through() {
        let provider = SqliteProvider::open_in_memory().unwrap();
        let err = provider.query("SELECT * FROM missing", &[]).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_configure_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteProvider::open(dir.path().join("test.db")).unwrap();
        provider.configure(&ConnectionOptions::default()).unwrap();

        let rows = provider.query("PRAGMA journal_mode", &[]).unwrap();
        assert_eq!(
            rows[0].values().first(),
            Some(&Value::Text("wal".into()))
        );
    }

    #[test]
    fn test_case_sensitive_like() {
        let provider = SqliteProvider::open_in_memory().unwrap();
        provider
            .configure(&ConnectionOptions {
                journal_mode: None,
                case_sensitive_like: true,
                busy_timeout: None,
            })
            .unwrap();

        let rows = provider
            .query("SELECT 'Clyde' LIKE 'clyde' AS matched", &[])
            .unwrap();
        assert_eq!(rows[0].get("matched"), Some(&Value::Integer(0)));
    }
}
