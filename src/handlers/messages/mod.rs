//! Message handlers module
//!
//! Handles free text while an add-place draft is in progress

use tracing::debug;
use crate::database::Store;
use crate::handlers::texts;
use crate::state::{DraftStore, PlaceDraft};
use crate::utils::errors::{PlaceBotError, Result};
use crate::utils::logging::{log_dialogue_transition, log_user_action};

/// Take `text` as the draft's place name
pub async fn accept_name(drafts: &dyn DraftStore, draft: PlaceDraft, text: &str) -> Result<String> {
    let user_id = draft.user_id;
    match draft.with_name(text) {
        Ok(named) => {
            drafts.store(user_id, named).await;
            log_dialogue_transition(user_id, "awaiting_name", "awaiting_priority");
            Ok(texts::ENTER_PRIORITY.to_string())
        }
        Err(PlaceBotError::InvalidInput(reason)) => {
            debug!(user_id = user_id, reason = %reason, "Place name rejected");
            Ok(texts::EMPTY_PLACE_NAME.to_string())
        }
        Err(e) => Err(e),
    }
}

/// Take `text` as the priority and persist the finished place. The draft
/// survives a non-numeric answer or a failed insert.
pub async fn accept_priority(
    store: &dyn Store,
    drafts: &dyn DraftStore,
    draft: PlaceDraft,
    text: &str,
) -> Result<String> {
    let user_id = draft.user_id;
    let priority = match text.trim().parse::<i32>() {
        Ok(priority) => priority,
        Err(e) => {
            debug!(user_id = user_id, error = %e, "Priority is not a number");
            return Ok(texts::NOT_A_NUMBER.to_string());
        }
    };

    let place = store.save_place(draft.into_place(priority)?).await?;
    drafts.delete(user_id).await;

    log_dialogue_transition(user_id, "awaiting_priority", "idle");
    log_user_action(user_id, "place_added", Some(place.place_name.as_str()));
    Ok(texts::PLACE_ADDED.to_string())
}
