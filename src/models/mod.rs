//! Data models module
//!
//! This module contains all data structures persisted by the bot

pub mod user;
pub mod place;

use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Row, Type};

// Re-export commonly used models
pub use user::{User, UserStatus, UserSearch};
pub use place::{Place, PlaceSearch};

/// Reads a column, yielding the zero value when it was not selected.
///
/// Custom column sets select a subset of an entity's columns; the rest
/// decode as defaults the same way a bare struct literal would.
pub(crate) fn column_or_default<'r, T>(row: &'r PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres> + Default,
{
    match row.try_get::<T, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(T::default()),
        Err(e) => Err(e),
    }
}
