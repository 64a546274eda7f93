//! Dialogue controller
//!
//! Runs one turn per inbound message: resolve where the sender stands,
//! apply the transition for their input, and send at most one reply.

use std::sync::Arc;
use tracing::{debug, warn};
use crate::database::Store;
use crate::handlers::commands::{add_place, places, start, Command, Input};
use crate::handlers::messages;
use crate::handlers::messenger::Messenger;
use crate::handlers::{texts, IncomingMessage};
use crate::state::{DialogueState, DraftStore};
use crate::utils::errors::Result;
use crate::utils::logging::{log_store_error, log_transport_error};

pub struct DialogueController {
    store: Arc<dyn Store>,
    drafts: Arc<dyn DraftStore>,
    messenger: Arc<dyn Messenger>,
}

impl DialogueController {
    pub fn new(store: Arc<dyn Store>, drafts: Arc<dyn DraftStore>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            store,
            drafts,
            messenger,
        }
    }

    /// Handle one inbound message. Failures never escape: store errors turn
    /// into a fallback reply, send errors are logged.
    pub async fn handle(&self, message: &IncomingMessage) {
        let reply = match self.turn(message).await {
            Ok(reply) => reply,
            Err(e) => {
                log_store_error("dialogue_turn", &e);
                Some(texts::SOMETHING_WENT_WRONG.to_string())
            }
        };

        let Some(text) = reply else {
            debug!(user_id = message.user_id, "Turn finished without a reply");
            return;
        };

        if let Err(e) = self.messenger.send_text(message.chat_id, &text).await {
            log_transport_error(message.chat_id, &e);
        }
    }

    async fn turn(&self, message: &IncomingMessage) -> Result<Option<String>> {
        let input = Input::parse(&message.text);
        let user = self.store.find_user(message.user_id).await?;
        let draft = match user {
            Some(_) => self.drafts.load(message.user_id).await,
            None => None,
        };
        let state = DialogueState::resolve(user, draft);
        let from = state.name();
        debug!(user_id = message.user_id, state = from, input = ?input, "Dialogue turn");

        match (input, state) {
            (Input::Command(Command::Start), DialogueState::Unregistered) => {
                start::register(self.store.as_ref(), message).await.map(Some)
            }
            (
                Input::Command(Command::Start),
                DialogueState::Idle { user }
                | DialogueState::AwaitingName { user, .. }
                | DialogueState::AwaitingPriority { user, .. },
            ) => Ok(Some(start::welcome_back(&user))),

            (Input::Command(Command::AddPlace | Command::Places), DialogueState::Unregistered)
            | (Input::Text(_), DialogueState::Unregistered) => {
                warn!(user_id = message.user_id, "Message from unregistered user");
                Ok(Some(texts::NOT_UNDERSTOOD.to_string()))
            }

            (
                Input::Command(Command::AddPlace),
                DialogueState::Idle { user }
                | DialogueState::AwaitingName { user, .. }
                | DialogueState::AwaitingPriority { user, .. },
            ) => Ok(Some(add_place::begin(self.drafts.as_ref(), &user, from).await)),

            (Input::Command(Command::Places), _) => places::list(self.store.as_ref()).await,

            (Input::Text(_), DialogueState::Idle { .. }) => Ok(Some(texts::NOT_UNDERSTOOD.to_string())),
            (Input::Text(text), DialogueState::AwaitingName { draft, .. }) => {
                messages::accept_name(self.drafts.as_ref(), draft, &text).await.map(Some)
            }
            (Input::Text(text), DialogueState::AwaitingPriority { draft, .. }) => {
                messages::accept_priority(self.store.as_ref(), self.drafts.as_ref(), draft, &text)
                    .await
                    .map(Some)
            }
        }
    }
}
