//! The WHERE clause tree.
//!
//! A [`Clause`] is either a leaf comparison, an `IN` list, or an `AND`/`OR`
//! group of nested clauses. Trees are built per query and handed to a query
//! builder, which compiles them with [`super::compile`].

use rusqlite::types::Value;

/// Comparison operator of a [`Clause::Comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exp {
    EqualTo,
    NotEqualTo,
    MoreThan,
    MoreThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    /// Pattern match. Wildcards (`%`, `_`) are taken from the value as-is.
    Like,
}

impl Exp {
    /// The SQL operator for this comparison.
    pub const fn symbol(self) -> &'static str {
        match self {
            Exp::EqualTo => "=",
            Exp::NotEqualTo => "!=",
            Exp::MoreThan => ">",
            Exp::MoreThanOrEqualTo => ">=",
            Exp::LessThan => "<",
            Exp::LessThanOrEqualTo => "<=",
            Exp::Like => "LIKE",
        }
    }
}

/// Logical operator joining the children of a [`Clause::Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    /// Separator placed between compiled children.
    pub const fn separator(self) -> &'static str {
        match self {
            Connective::And => " AND ",
            Connective::Or => " OR ",
        }
    }
}

/// One node of a WHERE expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `column <op> ?`
    Comparison {
        column: String,
        exp: Exp,
        value: Value,
    },

    /// `column IN (?, ?, ...)`
    InList { column: String, values: Vec<Value> },

    /// Children joined by `AND`/`OR`, always wrapped in parentheses.
    Group {
        connective: Connective,
        children: Vec<Clause>,
    },
}

impl Clause {
    /// Creates a comparison clause.
    ///
    /// Booleans convert to `0`/`1` through [`Value`]'s `From<bool>`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sqlking_db::expr::{Clause, Exp};
    ///
    /// let clause = Clause::compare("username", Exp::EqualTo, "clyde".to_string());
    /// let fragment = clause.compile().unwrap();
    /// assert_eq!(fragment.sql, "username = ?");
    /// ```
    pub fn compare(column: impl Into<String>, exp: Exp, value: impl Into<Value>) -> Self {
        Clause::Comparison {
            column: column.into(),
            exp,
            value: value.into(),
        }
    }

    /// Creates an `IN` clause. The list must not be empty by the time the
    /// clause is compiled.
    pub fn in_list<V, I>(column: impl Into<String>, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Clause::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Joins clauses with `AND`.
    pub fn and<I: IntoIterator<Item = Clause>>(children: I) -> Self {
        Clause::Group {
            connective: Connective::And,
            children: children.into_iter().collect(),
        }
    }

    /// Joins clauses with `OR`.
    pub fn or<I: IntoIterator<Item = Clause>>(children: I) -> Self {
        Clause::Group {
            connective: Connective::Or,
            children: children.into_iter().collect(),
        }
    }
}
