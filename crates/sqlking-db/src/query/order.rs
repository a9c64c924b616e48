//! ORDER BY and LIMIT specifications.

use std::fmt;

use crate::error::{DbError, Result};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => write!(f, "ASC"),
            Order::Desc => write!(f, "DESC"),
        }
    }
}

/// Ordered list of sort keys. Empty means the engine's natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    entries: Vec<(String, Order)>,
}

impl OrderSpec {
    pub fn push(&mut self, column: impl Into<String>, order: Order) {
        self.entries.push((column.into(), order));
    }

    /// ` ORDER BY c1 ASC, c2 DESC`, or nothing when empty.
    pub fn render(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let orders = self
            .entries
            .iter()
            .map(|(column, order)| format!("{column} {order}"))
            .collect::<Vec<_>>();
        Some(format!(" ORDER BY {}", orders.join(", ")))
    }
}

/// Result window: skip `offset` rows, return at most `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitSpec {
    pub offset: u32,
    pub count: u32,
}

impl LimitSpec {
    pub const fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    /// ` LIMIT offset,count`. A zero count is rejected.
    pub fn render(&self) -> Result<String> {
        if self.count == 0 {
            return Err(DbError::InvalidLimit {
                offset: self.offset,
                count: self.count,
            });
        }
        Ok(format!(" LIMIT {},{}", self.offset, self.count))
    }
}
