//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use crate::database::query::{Condition, Entity, Search, SqlValue, Table, USERS};
use super::column_or_default;

/// Lifecycle status, stored as `users.status_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum UserStatus {
    #[default]
    Enabled = 1,
    Deleted = 3,
}

impl From<UserStatus> for SqlValue {
    fn from(status: UserStatus) -> Self {
        SqlValue::Int(status as i32)
    }
}

/// A registered chat user; `id` is the external chat-user ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: i64, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            status: UserStatus::Enabled,
            created_at: Utc::now(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == UserStatus::Deleted
    }

    /// Decodes a user whose columns carry `prefix`, as joined rows do
    pub(crate) fn from_prefixed_row(row: &PgRow, prefix: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: column_or_default(row, &format!("{}id", prefix))?,
            nickname: column_or_default(row, &format!("{}nickname", prefix))?,
            status: column_or_default(row, &format!("{}status_id", prefix))?,
            created_at: column_or_default(row, &format!("{}created_at", prefix))?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Self::from_prefixed_row(row, "")
    }
}

impl Entity for User {
    const TABLE: &'static Table = &USERS;

    fn column_value(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "nickname" => Some(self.nickname.clone().into()),
            "status_id" => Some(self.status.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

/// User search criteria; `None` and empty fields impose no constraint
#[derive(Debug, Clone, Default)]
pub struct UserSearch {
    pub id: Option<i64>,
    pub ids: Option<Vec<i64>>,
    pub nickname: Option<String>,
    pub status: Option<UserStatus>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl Search for UserSearch {
    fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if let Some(id) = self.id {
            conditions.push(Condition::eq("id", id));
        }
        if let Some(ids) = self.ids.as_ref().filter(|ids| !ids.is_empty()) {
            conditions.push(Condition::any_of("id", ids.clone()));
        }
        if let Some(nickname) = self.nickname.as_deref().filter(|n| !n.is_empty()) {
            conditions.push(Condition::eq("nickname", nickname));
        }
        if let Some(status) = self.status {
            conditions.push(Condition::eq("status_id", status));
        }
        if let Some(after) = self.created_after {
            conditions.push(Condition::gte("created_at", after));
        }
        if let Some(before) = self.created_before {
            conditions.push(Condition::lte("created_at", before));
        }
        conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_enabled() {
        let user = User::new(1, "lena");
        assert_eq!(user.status, UserStatus::Enabled);
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_status_binds_as_integer() {
        assert_eq!(SqlValue::from(UserStatus::Enabled), SqlValue::Int(1));
        assert_eq!(SqlValue::from(UserStatus::Deleted), SqlValue::Int(3));
    }

    #[test]
    fn test_unknown_column_has_no_value() {
        let user = User::new(1, "lena");
        assert!(user.column_value("password").is_none());
        assert_eq!(user.column_value("id"), Some(SqlValue::BigInt(1)));
    }
}
