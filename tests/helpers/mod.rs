//! Test helpers module
//!
//! In-memory stand-ins for the store and the messenger, an optional
//! PostgreSQL test database and builders for inbound messages.

#![allow(dead_code)]

pub mod database_helper;
pub mod fakes;
pub mod telegram_mock;

pub use database_helper::*;
pub use fakes::*;
pub use telegram_mock::*;

use PlaceBot::IncomingMessage;

/// A private-chat text message from `user_id`
pub fn text_from(user_id: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: user_id,
        user_id,
        username: Some(format!("user{}", user_id)),
        first_name: format!("First{}", user_id),
        text: text.to_string(),
    }
}
