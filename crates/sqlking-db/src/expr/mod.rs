//! Expression types for building SQL conditions.
//!
//! This module contains the building blocks of query filters: the [`Clause`]
//! tree, typed [`Col`] references, and the compiler that turns a tree into a
//! parameterized fragment.

pub mod clause;
pub mod column;
pub mod compile;

pub use clause::{Clause, Connective, Exp};
pub use column::Col;
pub use compile::{compile, Fragment};
