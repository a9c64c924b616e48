//! The SELECT query builder.

use crate::{
    error::{DbError, Result},
    expr::Clause,
    materialize::{materialize, ResultRow},
    provider::SqlProvider,
    query::{
        order::{LimitSpec, Order, OrderSpec},
        push_joins, push_where, run_query, Statement,
    },
    schema::TableSchema,
    traits::Entity,
};

/// A SELECT query builder for SQLite.
///
/// Constructed via [`Select::builder`], then chained with `.filter()`,
/// `.order_by()`, `.limit()`. The target entity is named when the query runs,
/// and running consumes the builder.
///
/// # Example
///
/// ```rust
/// use sqlking_db::{create_table, define_entity, Insert, Order, Select, SqliteProvider};
///
/// #[derive(Debug, Default)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// define_entity!(
///     User => users {
///         table: "users",
///         columns: {
///             id: i64 => "id" [primary_key],
///             name: String => "name"
///         }
///     }
/// );
///
/// let provider = SqliteProvider::open_in_memory().unwrap();
/// create_table::<User>(&provider).unwrap();
/// Insert::builder()
///     .value(&User { id: 1, name: "clyde".into() })
///     .execute(&provider)
///     .unwrap();
///
/// let found = Select::builder()
///     .filter(users::id.gt(0))
///     .order_by(users::id, Order::Desc)
///     .limit(0, 10)
///     .execute::<User>(&provider)
///     .unwrap();
/// assert_eq!(found[0].name, "clyde");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    columns: Vec<String>,
    joins: Vec<String>,
    clause: Option<Clause>,
    order: OrderSpec,
    limit: Option<LimitSpec>,
}

impl Select {
    /// Starts a new query.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Select specific columns. Without this every mapped column is selected.
    pub fn select<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.columns
            .extend(columns.into_iter().map(|c| c.as_ref().to_string()));
        self
    }

    /// Adds a JOIN clause, rendered verbatim after `FROM`.
    ///
    /// Once a join is added, the default projection is qualified with the
    /// queried table so shared column names stay unambiguous. Filters and
    /// sort keys on shared names need the qualified form, e.g. `"Post.id"`.
    ///
    /// ```rust,ignore
    /// let posts = Select::builder()
    ///     .join("INNER JOIN User ON User.id = Post.userId")
    ///     .filter(users::username.eq("clyde"))
    ///     .execute::<Post>(&provider)?;
    /// ```
    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.joins.push(join.into());
        self
    }

    /// Sets the WHERE clause, replacing any clause set earlier.
    pub fn filter(mut self, clause: Clause) -> Self {
        self.clause = Some(clause);
        self
    }

    /// Adds an ORDER BY key after the ones already added.
    pub fn order_by(mut self, column: impl AsRef<str>, order: Order) -> Self {
        self.order.push(column.as_ref(), order);
        self
    }

    /// Sets the result window, replacing any window set earlier.
    pub fn limit(mut self, offset: u32, count: u32) -> Self {
        self.limit = Some(LimitSpec::new(offset, count));
        self
    }

    pub fn clause(&self) -> Option<&Clause> {
        self.clause.as_ref()
    }

    fn projection(&self, schema: &TableSchema) -> Vec<String> {
        if self.columns.is_empty() {
            schema.column_names()
        } else {
            self.columns.clone()
        }
    }

    /// Builds the SQL text and bound values for `schema` without running it.
    pub fn to_statement(&self, schema: &TableSchema) -> Result<Statement> {
        let mut projection = self.projection(schema);
        if projection.is_empty() {
            projection.push("*".to_string());
        }
        // only the default projection is qualified; explicit columns are kept as given
        if self.columns.is_empty() && !self.joins.is_empty() {
            projection = projection
                .iter()
                .map(|column| format!("{}.{}", schema.table, column))
                .collect();
        }
        let select = projection.join(", ");

        let mut params = vec![];
        let mut sql = format!("SELECT {} FROM {}", select, schema.table);

        push_joins(&mut sql, &self.joins);
        push_where(&mut sql, &mut params, self.clause.as_ref())?;

        if let Some(order) = self.order.render() {
            sql.push_str(&order);
        }

        if let Some(limit) = &self.limit {
            sql.push_str(&limit.render()?);
        }

        Ok(Statement { sql, params })
    }

    /// Runs the query against `schema` and returns the raw rows.
    pub fn fetch_rows(self, schema: &TableSchema, provider: &dyn SqlProvider) -> Result<Vec<ResultRow>> {
        let statement = self.to_statement(schema)?;
        run_query(provider, &statement)
    }

    /// Runs the query and maps every row to `E`. No match gives an empty vec.
    pub fn execute<E: Entity>(self, provider: &dyn SqlProvider) -> Result<Vec<E>> {
        let schema = E::schema();
        let required = self.projection(schema);
        let rows = self.fetch_rows(schema, provider)?;
        materialize(rows, &required)
    }

    fn single(mut self) -> Self {
        if self.limit.is_none() {
            self.limit = Some(LimitSpec::new(0, 1));
        }
        self
    }

    /// Runs the query and returns the first row.
    ///
    /// Without an explicit limit the query is sent with `LIMIT 0,1`. Several
    /// matches are not an error; the first row in result order is returned.
    pub fn execute_single<E: Entity>(self, provider: &dyn SqlProvider) -> Result<E> {
        self.single()
            .execute::<E>(provider)?
            .into_iter()
            .next()
            .ok_or_else(|| no_match(&E::schema().table))
    }

    /// Raw-row counterpart of [`Select::execute_single`].
    pub fn fetch_single(self, schema: &TableSchema, provider: &dyn SqlProvider) -> Result<ResultRow> {
        self.single()
            .fetch_rows(schema, provider)?
            .into_iter()
            .next()
            .ok_or_else(|| no_match(&schema.table))
    }
}

fn no_match(table: &str) -> DbError {
    DbError::NotFound(format!("no row in `{table}` matched the query"))
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use super::*;
    use crate::test_utils::{posts, users, Post, RecordingProvider, User};

    #[test]
    fn test_projects_all_mapped_columns() {
        let statement = Select::builder().to_statement(User::schema()).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT id, username, timestamp, isRegistered FROM User"
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_full_statement_shape() {
        let statement = Select::builder()
            .select([users::username.name, users::timestamp.name])
            .filter(Clause::or([
                users::username.eq("clyde".to_string()),
                users::username.in_(["gill".to_string(), "angie".to_string()]),
            ]))
            .order_by(users::timestamp, Order::Asc)
            .order_by(users::username, Order::Desc)
            .limit(2, 4)
            .to_statement(User::schema())
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT username, timestamp FROM User \
             WHERE (username = ? OR username IN (?, ?)) \
             ORDER BY timestamp ASC, username DESC LIMIT 2,4"
        );
        assert_eq!(
            statement.params,
            vec![
                Value::Text("clyde".into()),
                Value::Text("gill".into()),
                Value::Text("angie".into()),
            ]
        );
    }

    #[test]
    fn test_join_renders_between_from_and_where() {
        let statement = Select::builder()
            .join("INNER JOIN User ON User.id = Post.userId")
            .filter(users::username.eq("clyde"))
            .order_by("Post.timestamp", Order::Desc)
            .limit(0, 5)
            .to_statement(Post::schema())
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT Post.id, Post.title, Post.body, Post.timestamp, Post.userId FROM Post \
             INNER JOIN User ON User.id = Post.userId \
             WHERE username = ? ORDER BY Post.timestamp DESC LIMIT 0,5"
        );
        assert_eq!(statement.params, vec![Value::Text("clyde".into())]);
    }

    #[test]
    fn test_join_keeps_explicit_columns() {
        let statement = Select::builder()
            .select([posts::title.name, "User.username"])
            .join("LEFT JOIN User ON User.id = Post.userId")
            .join("LEFT JOIN Tag ON Tag.postId = Post.id")
            .to_statement(Post::schema())
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT title, User.username FROM Post \
             LEFT JOIN User ON User.id = Post.userId \
             LEFT JOIN Tag ON Tag.postId = Post.id"
        );
    }

    #[test]
    fn test_second_filter_replaces_first() {
        let query = Select::builder()
            .filter(users::username.eq("clyde".to_string()))
            .filter(users::is_registered.eq(true));

        assert_eq!(query.clause(), Some(&users::is_registered.eq(true)));

        let statement = query.to_statement(User::schema()).unwrap();
        assert!(statement.sql.ends_with("FROM User WHERE isRegistered = ?"));
        assert_eq!(statement.params, vec![Value::Integer(1)]);
    }

    #[test]
    fn test_last_limit_wins() {
        let statement = Select::builder()
            .limit(0, 2)
            .limit(5, 10)
            .to_statement(User::schema())
            .unwrap();
        assert!(statement.sql.ends_with(" LIMIT 5,10"));
    }

    #[test]
    fn test_invalid_clause_fails_before_provider_call() {
        let provider = RecordingProvider::default();
        let result = Select::builder()
            .filter(users::username.in_(Vec::<String>::new()))
            .execute::<User>(&provider);

        assert!(matches!(result, Err(DbError::InvalidClause(_))));
        assert!(provider.statements().is_empty());
    }

    #[test]
    fn test_zero_count_limit_rejected() {
        let result = Select::builder()
            .limit(0, 0)
            .to_statement(User::schema());
        assert!(matches!(result, Err(DbError::InvalidLimit { .. })));
    }

    #[test]
    fn test_provider_receives_exact_statement() {
        let provider = RecordingProvider::default();
        Select::builder()
            .filter(users::timestamp.gte(1000i64))
            .execute::<User>(&provider)
            .unwrap();

        let statements = provider.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].sql,
            "SELECT id, username, timestamp, isRegistered FROM User WHERE timestamp >= ?"
        );
        assert_eq!(statements[0].params, vec![Value::Integer(1000)]);
    }

    #[test]
    fn test_execute_single_adds_implicit_limit() {
        let provider = RecordingProvider::with_rows(vec![
            RecordingProvider::user_row(1, "clyde"),
            RecordingProvider::user_row(2, "angie"),
        ]);

        let user = Select::builder()
            .filter(users::username.like("%e"))
            .execute_single::<User>(&provider)
            .unwrap();

        // first row wins, no uniqueness check
        assert_eq!(user.username, "clyde");
        assert!(provider.statements()[0].sql.ends_with(" LIMIT 0,1"));
    }

    #[test]
    fn test_execute_single_keeps_explicit_limit() {
        let provider = RecordingProvider::with_rows(vec![RecordingProvider::user_row(3, "gill")]);

        Select::builder()
            .limit(2, 4)
            .execute_single::<User>(&provider)
            .unwrap();
        assert!(provider.statements()[0].sql.ends_with(" LIMIT 2,4"));
    }

    #[test]
    fn test_execute_single_not_found() {
        let provider = RecordingProvider::default();
        let result = Select::builder().execute_single::<User>(&provider);
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_fetch_single_raw_row() {
        let provider = RecordingProvider::with_rows(vec![RecordingProvider::user_row(4, "josh")]);

        let row = Select::builder()
            .fetch_single(User::schema(), &provider)
            .unwrap();
        assert_eq!(row.get("username"), Some(&Value::Text("josh".into())));
        assert!(provider.statements()[0].sql.ends_with(" LIMIT 0,1"));

        let empty = RecordingProvider::default();
        let result = Select::builder().fetch_single(User::schema(), &empty);
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_provider_failure_carries_sql() {
        let provider = RecordingProvider::failing();
        let err = Select::builder().execute::<User>(&provider).unwrap_err();
        match err {
            DbError::Query { sql, .. } => {
                assert_eq!(sql, "SELECT id, username, timestamp, isRegistered FROM User")
            }
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[test]
    fn test_projection_without_schema_columns() {
        let schema = TableSchema::new("anything", vec![]);
        let statement = Select::builder().to_statement(&schema).unwrap();
        assert_eq!(statement.sql, "SELECT * FROM anything");
    }
}
