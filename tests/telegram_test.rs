//! TelegramMessenger against a mocked Bot API

mod helpers;

use std::sync::Arc;
use assert_matches::assert_matches;
use helpers::*;
use PlaceBot::handlers::{texts, Messenger, TelegramMessenger};
use PlaceBot::models::User;
use PlaceBot::state::InMemoryDraftStore;
use PlaceBot::{DialogueController, PlaceBotError};

#[tokio::test]
async fn test_send_text_posts_send_message() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message_ok().await;
    let messenger = TelegramMessenger::new(mock.bot());

    messenger.send_text(42, "Привет!").await.unwrap();

    let bodies = mock.sent_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["chat_id"], 42);
    assert_eq!(bodies[0]["text"], "Привет!");
}

#[tokio::test]
async fn test_api_error_is_telegram_error() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message_error("Bad Request: chat not found").await;
    let messenger = TelegramMessenger::new(mock.bot());

    let result = messenger.send_text(42, "hello").await;

    assert_matches!(result, Err(PlaceBotError::Telegram(_)));
}

#[tokio::test]
async fn test_controller_replies_through_bot_api() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message_ok().await;
    let store = Arc::new(MemoryStore::new());
    store.insert_user(User::new(42, "lena"));
    let controller = DialogueController::new(
        store.clone(),
        Arc::new(InMemoryDraftStore::new()),
        Arc::new(TelegramMessenger::new(mock.bot())),
    );

    controller.handle(&text_from(42, "/places")).await;
    assert!(mock.sent_bodies().await.is_empty());

    controller.handle(&text_from(42, "hi")).await;
    let bodies = mock.sent_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["text"], texts::NOT_UNDERSTOOD);
}

#[tokio::test]
async fn test_controller_survives_api_error() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message_error("Forbidden: bot was blocked by the user").await;
    let store = Arc::new(MemoryStore::new());
    let controller = DialogueController::new(
        store.clone(),
        Arc::new(InMemoryDraftStore::new()),
        Arc::new(TelegramMessenger::new(mock.bot())),
    );

    controller.handle(&text_from(42, "/start")).await;

    assert_eq!(store.users().len(), 1);
    assert_eq!(mock.sent_bodies().await.len(), 1);
}
