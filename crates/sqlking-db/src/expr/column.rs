//! Represents a typed database column.
//!
//! `Col<T>` ties a column name to a Rust type `T`. Its comparison helpers
//! build [`Clause`] leaves, so filters can be written as
//! `users::username.eq("clyde".to_string())`.

use std::marker::PhantomData;

use rusqlite::types::Value;

use crate::expr::clause::{Clause, Exp};

/// A typed reference to a database column.
///
/// The type parameter `T` is the Rust type of the mapped field. Comparison
/// values must convert into `T`, so a text column takes `&str` or `String`
/// and an integer column rejects text.
///
/// # Example
///
/// ```rust
/// use sqlking_db::expr::Col;
/// const NAME: Col<String> = Col::new("name");
/// let clause = NAME.eq("clyde");
/// ```
///
/// ```compile_fail
/// use sqlking_db::expr::Col;
/// const TIMESTAMP: Col<i64> = Col::new("timestamp");
/// let clause = TIMESTAMP.eq("later");
/// ```
pub struct Col<T> {
    pub name: &'static str,
    _type: PhantomData<T>,
}

impl<T> Clone for Col<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Col<T> {}

impl<T> std::fmt::Debug for Col<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Col").field(&self.name).finish()
    }
}

impl<T> AsRef<str> for Col<T> {
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl<T> Col<T> {
    /// Creates a new column reference.
    ///
    /// # Parameters
    ///
    /// - `name`: the actual column name in the database (e.g., `"user_name"`)
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }
}

impl<T: Into<Value>> Col<T> {
    fn compare<V: Into<T>>(self, exp: Exp, value: V) -> Clause {
        let value: T = value.into();
        Clause::compare(self.name, exp, value)
    }

    /// Creates a SQL `=` condition.
    pub fn eq<V: Into<T>>(self, value: V) -> Clause {
        self.compare(Exp::EqualTo, value)
    }

    /// Creates a SQL `!=` condition.
    pub fn ne<V: Into<T>>(self, value: V) -> Clause {
        self.compare(Exp::NotEqualTo, value)
    }

    /// Creates a SQL `>` condition.
    pub fn gt<V: Into<T>>(self, value: V) -> Clause {
        self.compare(Exp::MoreThan, value)
    }

    /// Creates a SQL `>=` condition.
    pub fn gte<V: Into<T>>(self, value: V) -> Clause {
        self.compare(Exp::MoreThanOrEqualTo, value)
    }

    /// Creates a SQL `<` condition.
    pub fn lt<V: Into<T>>(self, value: V) -> Clause {
        self.compare(Exp::LessThan, value)
    }

    /// Creates a SQL `<=` condition.
    pub fn lte<V: Into<T>>(self, value: V) -> Clause {
        self.compare(Exp::LessThanOrEqualTo, value)
    }

    /// Creates a SQL `LIKE` condition. The pattern is used verbatim, so
    /// include `%` wildcards where needed.
    pub fn like(self, pattern: impl Into<String>) -> Clause {
        Clause::compare(self.name, Exp::Like, pattern.into())
    }

    /// Creates a SQL `IN` condition.
    pub fn in_<V, I>(self, values: I) -> Clause
    where
        V: Into<T>,
        I: IntoIterator<Item = V>,
    {
        Clause::in_list(self.name, values.into_iter().map(Into::<T>::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERNAME: Col<String> = Col::new("username");
    const IS_REGISTERED: Col<bool> = Col::new("isRegistered");

    #[test]
    fn test_column_helpers_build_clauses() {
        assert_eq!(
            USERNAME.eq("clyde".to_string()),
            Clause::Comparison {
                column: "username".into(),
                exp: Exp::EqualTo,
                value: Value::Text("clyde".into()),
            }
        );
        assert_eq!(
            IS_REGISTERED.ne(true),
            Clause::Comparison {
                column: "isRegistered".into(),
                exp: Exp::NotEqualTo,
                value: Value::Integer(1),
            }
        );
        assert_eq!(
            USERNAME.like("jo%").compile().unwrap().sql,
            "username LIKE ?"
        );
    }

    #[test]
    fn test_values_convert_through_column_type() {
        const TIMESTAMP: Col<i64> = Col::new("timestamp");

        assert_eq!(USERNAME.eq("clyde"), USERNAME.eq("clyde".to_string()));
        assert_eq!(
            TIMESTAMP.gt(1000i32),
            Clause::compare("timestamp", Exp::MoreThan, Value::Integer(1000))
        );
        assert_eq!(
            USERNAME.in_(["gill", "angie"]),
            Clause::in_list("username", ["gill".to_string(), "angie".to_string()])
        );
    }

    #[test]
    fn test_in_helper() {
        let clause = USERNAME.in_(["gill".to_string(), "angie".to_string()]);
        let fragment = clause.compile().unwrap();
        assert_eq!(fragment.sql, "username IN (?, ?)");
    }
}
