//! Place repository operations

use crate::database::query::{with_columns, with_sort, Pager, QueryOp, SortField, PLACES};
use crate::models::place::{Place, PlaceSearch};
use crate::utils::errors::Result;
use super::CommonRepository;

impl CommonRepository {
    /// Own columns plus the joined owner
    pub fn full_place(&self) -> QueryOp {
        with_columns(self.defaults().joins(&PLACES))
    }

    pub fn default_place_sort(&self) -> QueryOp {
        with_sort(self.defaults().sort(&PLACES).to_vec())
    }

    /// Highest priority first, ties in insertion order
    pub fn priority_sort() -> QueryOp {
        with_sort(vec![SortField::desc("place_priority"), SortField::asc("id")])
    }

    pub async fn place_by_id(&self, id: i64, ops: &[QueryOp]) -> Result<Option<Place>> {
        let search = PlaceSearch {
            id: Some(id),
            ..Default::default()
        };
        self.one_place(&search, ops).await
    }

    pub async fn one_place(&self, search: &PlaceSearch, ops: &[QueryOp]) -> Result<Option<Place>> {
        self.one::<Place, _>(search, ops).await
    }

    pub async fn places_by_filters(
        &self,
        search: &PlaceSearch,
        pager: Pager,
        ops: &[QueryOp],
    ) -> Result<Vec<Place>> {
        self.list::<Place, _>(search, pager, ops).await
    }

    pub async fn count_places(&self, search: &PlaceSearch, ops: &[QueryOp]) -> Result<i64> {
        self.count::<Place, _>(search, ops).await
    }

    /// Insert a place; the returned copy carries the assigned ID
    pub async fn add_place(&self, place: &Place, ops: &[QueryOp]) -> Result<Place> {
        self.add(place, ops).await
    }

    pub async fn update_place(&self, place: &Place, ops: &[QueryOp]) -> Result<bool> {
        self.update(place, ops).await
    }
}
