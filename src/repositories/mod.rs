//! Database access layer.
//!
//! Module-level async functions over `&PgPool`; all queries are
//! parameterized.

pub mod books;
pub mod reviews;
pub mod users;
