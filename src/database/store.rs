//! Persistence operations the dialogue needs

use async_trait::async_trait;
use crate::database::query::{without_baseline, Pager};
use crate::database::repositories::CommonRepository;
use crate::models::{Place, PlaceSearch, User};
use crate::utils::errors::Result;

#[async_trait]
pub trait Store: Send + Sync {
    /// Registered, not deleted user
    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    /// User regardless of status
    async fn find_any_user(&self, id: i64) -> Result<Option<User>>;

    async fn register_user(&self, user: User) -> Result<User>;

    async fn save_user(&self, user: &User) -> Result<bool>;

    async fn save_place(&self, place: Place) -> Result<Place>;

    /// All places, highest priority first
    async fn places_by_priority(&self) -> Result<Vec<Place>>;
}

#[async_trait]
impl Store for CommonRepository {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        self.user_by_id(id, &[]).await
    }

    async fn find_any_user(&self, id: i64) -> Result<Option<User>> {
        self.user_by_id(id, &[without_baseline()]).await
    }

    async fn register_user(&self, user: User) -> Result<User> {
        self.add_user(&user, &[]).await
    }

    async fn save_user(&self, user: &User) -> Result<bool> {
        self.update_user(user, &[]).await
    }

    async fn save_place(&self, place: Place) -> Result<Place> {
        self.add_place(&place, &[]).await
    }

    async fn places_by_priority(&self) -> Result<Vec<Place>> {
        self.places_by_filters(
            &PlaceSearch::default(),
            Pager::NoLimit,
            &[CommonRepository::priority_sort()],
        )
        .await
    }
}
