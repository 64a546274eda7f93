//! User repository operations

use crate::database::query::{with_columns, with_sort, Pager, QueryOp, USERS};
use crate::models::user::{User, UserSearch, UserStatus};
use crate::utils::errors::Result;
use super::CommonRepository;

impl CommonRepository {
    /// Every own column of the user
    pub fn full_user(&self) -> QueryOp {
        with_columns(self.defaults().joins(&USERS))
    }

    /// Newest users first
    pub fn default_user_sort(&self) -> QueryOp {
        with_sort(self.defaults().sort(&USERS).to_vec())
    }

    /// Find user by chat-user ID, skipping soft-deleted ones unless `ops`
    /// lift the baseline
    pub async fn user_by_id(&self, id: i64, ops: &[QueryOp]) -> Result<Option<User>> {
        let search = UserSearch {
            id: Some(id),
            ..Default::default()
        };
        self.one_user(&search, ops).await
    }

    pub async fn one_user(&self, search: &UserSearch, ops: &[QueryOp]) -> Result<Option<User>> {
        self.one::<User, _>(search, ops).await
    }

    pub async fn users_by_filters(
        &self,
        search: &UserSearch,
        pager: Pager,
        ops: &[QueryOp],
    ) -> Result<Vec<User>> {
        self.list::<User, _>(search, pager, ops).await
    }

    pub async fn count_users(&self, search: &UserSearch, ops: &[QueryOp]) -> Result<i64> {
        self.count::<User, _>(search, ops).await
    }

    /// Insert a user; `created_at` is always assigned by the database
    pub async fn add_user(&self, user: &User, ops: &[QueryOp]) -> Result<User> {
        self.add(user, ops).await
    }

    pub async fn update_user(&self, user: &User, ops: &[QueryOp]) -> Result<bool> {
        self.update(user, ops).await
    }

    /// Mark the user deleted; only `status_id` is written
    pub async fn soft_delete_user(&self, id: i64) -> Result<bool> {
        let mut user = User::new(id, "");
        user.status = UserStatus::Deleted;
        self.update_user(&user, &[with_columns(&["status_id"])]).await
    }
}
