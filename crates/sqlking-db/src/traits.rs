//! Core traits that power the query builders.
//!
//! These traits define the contract for:
//! - Describing and populating row-mapped entities (`Entity`)
//! - Declaring the storage class of a field type (`SqlType`)

use rusqlite::types::{FromSqlResult, Value, ValueRef};

use crate::schema::{ColumnType, TableSchema};

/// A row-mapped entity.
///
/// Usually implemented through [`crate::define_entity!`], which caches the
/// schema in a static so it is derived once per type.
///
/// # Example
///
/// ```rust
/// use sqlking_db::{define_entity, Entity};
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
/// assert_eq!(User::schema().table, "users");
/// assert_eq!(users::name.name, "name");
/// ```
pub trait Entity: Default {
    /// The table and column mapping of this entity.
    fn schema() -> &'static TableSchema;

    /// Assigns the field mapped to `column`.
    ///
    /// Returns `Ok(false)` when no field is mapped to the column.
    fn set_field(&mut self, column: &str, value: ValueRef<'_>) -> FromSqlResult<bool>;

    /// Mapped column values in schema order, used by inserts.
    fn to_values(&self) -> Vec<(&'static str, Value)>;
}

/// Field types that can be stored in a mapped column.
pub trait SqlType {
    const KIND: ColumnType;
}

macro_rules! impl_sql_type {
    ($kind:ident => $($ty:ty),*) => {
        $(
            impl SqlType for $ty {
                const KIND: ColumnType = ColumnType::$kind;
            }
        )*
    };
}

impl_sql_type!(Integer => i8, i16, i32, i64, u8, u16, u32, bool);
impl_sql_type!(Real => f32, f64);
impl_sql_type!(Text => String);
impl_sql_type!(Blob => Vec<u8>);

impl<T: SqlType> SqlType for Option<T> {
    const KIND: ColumnType = T::KIND;
}
