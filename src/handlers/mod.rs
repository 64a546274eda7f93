//! Bot handlers module
//!
//! This module contains the dialogue controller and the handlers it
//! dispatches to:
//! - Command handlers for /start, /add_place and /places
//! - Message handlers for free text inside the add-place dialogue

pub mod commands;
pub mod dialogue;
pub mod messages;
pub mod messenger;
pub mod texts;

use teloxide::types::Message;

// Re-export commonly used handler components
pub use commands::{Command, Input};
pub use dialogue::DialogueController;
pub use messenger::{Messenger, TelegramMessenger};

/// The parts of an inbound text message a dialogue turn reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub text: String,
}

impl IncomingMessage {
    /// `None` for messages without text or without a sender
    pub fn from_telegram(msg: &Message) -> Option<Self> {
        let text = msg.text()?;
        let sender = msg.from.as_ref()?;

        Some(Self {
            chat_id: msg.chat.id.0,
            user_id: sender.id.0 as i64,
            username: sender.username.clone(),
            first_name: sender.first_name.clone(),
            text: text.to_string(),
        })
    }

    /// Telegram username, or the first name for users without one
    pub fn nickname(&self) -> String {
        self.username
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.first_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(username: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            chat_id: 10,
            user_id: 20,
            username: username.map(str::to_string),
            first_name: "Lena".to_string(),
            text: "/start".to_string(),
        }
    }

    #[test]
    fn test_nickname_prefers_username() {
        assert_eq!(message(Some("lenabot_fan")).nickname(), "lenabot_fan");
    }

    #[test]
    fn test_nickname_falls_back_to_first_name() {
        assert_eq!(message(None).nickname(), "Lena");
        assert_eq!(message(Some("")).nickname(), "Lena");
    }
}
