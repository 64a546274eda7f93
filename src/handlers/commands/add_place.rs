//! Add-place command handler

use crate::handlers::texts;
use crate::models::User;
use crate::state::{DraftStore, PlaceDraft};
use crate::utils::logging::log_dialogue_transition;

/// Start a new draft for `user`, replacing any in progress
pub async fn begin(drafts: &dyn DraftStore, user: &User, from: &str) -> String {
    drafts.store(user.id, PlaceDraft::new(user.id)).await;
    log_dialogue_transition(user.id, from, "awaiting_name");
    texts::ENTER_PLACE_NAME.to_string()
}
