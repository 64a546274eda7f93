//! Place model

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use crate::database::query::{Condition, Entity, Search, SqlValue, Table, PLACES};
use super::{column_or_default, User};

/// Relation name under which a place's owner is joined
pub const USER_RELATION: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Assigned by the store on insert
    pub id: i64,
    pub user_id: i64,
    pub place_name: String,
    pub place_priority: i32,
    /// Owner, present only when the `user` relation was joined
    pub user: Option<User>,
}

impl Place {
    pub fn new(user_id: i64, place_name: impl Into<String>, place_priority: i32) -> Self {
        Self {
            id: 0,
            user_id,
            place_name: place_name.into(),
            place_priority,
            user: None,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Place {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let owner_key = format!("{}__id", USER_RELATION);
        let user = match row.try_get::<Option<i64>, _>(owner_key.as_str()) {
            Ok(Some(_)) => Some(User::from_prefixed_row(row, &format!("{}__", USER_RELATION))?),
            Ok(None) | Err(sqlx::Error::ColumnNotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            id: column_or_default(row, "id")?,
            user_id: column_or_default(row, "user_id")?,
            place_name: column_or_default(row, "place_name")?,
            place_priority: column_or_default(row, "place_priority")?,
            user,
        })
    }
}

impl Entity for Place {
    const TABLE: &'static Table = &PLACES;

    fn column_value(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "user_id" => Some(self.user_id.into()),
            "place_name" => Some(self.place_name.clone().into()),
            "place_priority" => Some(self.place_priority.into()),
            _ => None,
        }
    }
}

/// Place search criteria; `None` and empty fields impose no constraint
#[derive(Debug, Clone, Default)]
pub struct PlaceSearch {
    pub id: Option<i64>,
    pub ids: Option<Vec<i64>>,
    pub user_id: Option<i64>,
    pub place_name: Option<String>,
    pub min_priority: Option<i32>,
    pub max_priority: Option<i32>,
}

impl Search for PlaceSearch {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if let Some(id) = self.id {
            conditions.push(Condition::eq("id", id));
        }
        if let Some(ids) = self.ids.as_ref().filter(|ids| !ids.is_empty()) {
            conditions.push(Condition::any_of("id", ids.clone()));
        }
        if let Some(user_id) = self.user_id {
            conditions.push(Condition::eq("user_id", user_id));
        }
        if let Some(name) = self.place_name.as_deref().filter(|n| !n.is_empty()) {
            conditions.push(Condition::eq("place_name", name));
        }
        if let Some(min) = self.min_priority {
            conditions.push(Condition::gte("place_priority", min));
        }
        if let Some(max) = self.max_priority {
            conditions.push(Condition::lte("place_priority", max));
        }
        conditions
    }
}
