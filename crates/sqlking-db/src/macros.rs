//! Macros for defining entity schemas.
//!
//! The [`define_entity!`] macro maps a struct onto a table: it implements
//! [`crate::Entity`] for the struct and generates a module of typed column
//! constants.

/// Maps a struct onto a table.
///
/// The struct itself is declared by the caller and must implement `Default`.
/// Each column line names the struct field, its type and the database column.
/// Optional flags in brackets mark the column as `primary_key` and/or `index`.
///
/// # Syntax
///
/// ```ignore
/// define_entity!(
///     User => users {
///         table: "User",
///         columns: {
///             id: i64 => "id" [primary_key],
///             username: String => "username" [index],
///             is_registered: bool => "isRegistered"
///         }
///     }
/// );
/// ```
///
/// This expands to an `impl Entity for User` and:
///
/// ```ignore
/// pub mod users {
///     pub const TABLE: &str = "User";
///     pub const id: sqlking_db::expr::Col<i64> = Col::new("id");
///     pub const username: sqlking_db::expr::Col<String> = Col::new("username");
///     pub const is_registered: sqlking_db::expr::Col<bool> = Col::new("isRegistered");
/// }
/// ```
///
/// # Usage
///
/// ```ignore
/// let users = Select::builder()
///     .filter(users::username.eq("clyde".to_string()))
///     .execute::<User>(&provider)?;
/// ```
#[macro_export]
macro_rules! define_entity {
    (
        $entity:ty => $module:ident {
            table: $table:literal,
            columns: {
                $($field:ident: $col_type:ty => $db_col:literal $([$($flag:ident),+])?),* $(,)?
            }
        }
    ) => {
        #[allow(non_upper_case_globals, dead_code)]
        pub mod $module {
            #[allow(unused_imports)]
            use super::*;
            use $crate::expr::column::Col;

            pub const TABLE: &str = $table;

            $(
                pub const $field: Col<$col_type> = Col::new($db_col);
            )*
        }

        impl $crate::Entity for $entity {
            fn schema() -> &'static $crate::schema::TableSchema {
                static SCHEMA: ::std::sync::LazyLock<$crate::schema::TableSchema> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::schema::TableSchema::new(
                            $table,
                            vec![
                                $(
                                    $crate::schema::ColumnDef::new(
                                        $db_col,
                                        <$col_type as $crate::traits::SqlType>::KIND,
                                    )$($(.$flag())+)?
                                ),*
                            ],
                        )
                    });
                &SCHEMA
            }

            fn set_field(
                &mut self,
                column: &str,
                value: $crate::rusqlite::types::ValueRef<'_>,
            ) -> $crate::rusqlite::types::FromSqlResult<bool> {
                match column {
                    $(
                        $db_col => {
                            self.$field =
                                <$col_type as $crate::rusqlite::types::FromSql>::column_result(value)?;
                            Ok(true)
                        }
                    )*
                    _ => Ok(false),
                }
            }

            fn to_values(&self) -> Vec<(&'static str, $crate::rusqlite::types::Value)> {
                vec![
                    $(
                        (
                            $db_col,
                            $crate::rusqlite::types::Value::from(
                                ::std::clone::Clone::clone(&self.$field),
                            ),
                        )
                    ),*
                ]
            }
        }
    };
}
