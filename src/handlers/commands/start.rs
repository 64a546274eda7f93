//! Start command handler
//!
//! Handles the /start command: registration for new users, a greeting for
//! known ones

use tracing::info;
use crate::database::Store;
use crate::handlers::{texts, IncomingMessage};
use crate::models::{User, UserStatus};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// Register the sender. A previously deleted record for the same ID is
/// re-enabled under the current nickname instead of inserted again.
pub async fn register(store: &dyn Store, message: &IncomingMessage) -> Result<String> {
    let nickname = message.nickname();

    let user = match store.find_any_user(message.user_id).await? {
        Some(mut user) => {
            user.status = UserStatus::Enabled;
            user.nickname = nickname;
            store.save_user(&user).await?;
            log_user_action(user.id, "reenabled", None);
            user
        }
        None => {
            let user = store.register_user(User::new(message.user_id, nickname)).await?;
            info!(user_id = user.id, nickname = %user.nickname, "New user registered");
            user
        }
    };

    Ok(texts::welcome_new(&user.nickname))
}

pub fn welcome_back(user: &User) -> String {
    log_user_action(user.id, "start", Some("returning"));
    texts::welcome_back(&user.nickname)
}
