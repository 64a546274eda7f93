//! PlaceBot Telegram Bot
//!
//! A Telegram bot for keeping a shared, prioritised list of places to visit.
//! This library provides the composable query layer, the entity
//! repositories, the add-place dialogue state and the dialogue controller.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PlaceBotError, Result};

// Re-export main components for easy access
pub use database::{CommonRepository, Store};
pub use handlers::{DialogueController, IncomingMessage, Messenger, TelegramMessenger};
pub use state::{DraftStore, InMemoryDraftStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
