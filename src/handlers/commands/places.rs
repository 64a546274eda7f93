//! Places command handler

use crate::database::Store;
use crate::handlers::texts;
use crate::models::Place;
use crate::utils::errors::Result;

/// The places list reply, `None` when there is nothing to list
pub async fn list(store: &dyn Store) -> Result<Option<String>> {
    let places = store.places_by_priority().await?;
    if places.is_empty() {
        return Ok(None);
    }

    Ok(Some(format!("{}\n\n{}", texts::PLACES_HEADER, render_places(&places))))
}

/// One `"<n>. Название: <name>, Приоритет: <priority>"` line per place,
/// numbered from 1 in the given order
pub fn render_places(places: &[Place]) -> String {
    places
        .iter()
        .enumerate()
        .map(|(i, place)| {
            format!(
                "{}. Название: {}, Приоритет: {}",
                i + 1,
                place.place_name,
                place.place_priority
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
