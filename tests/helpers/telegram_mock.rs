//! Mock Telegram API Server for testing
//!
//! A wiremock server standing in for the Bot API so `TelegramMessenger`
//! can be exercised without network access.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "123456:TEST_TOKEN";

pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// A bot whose requests go to this server
    pub fn bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server URI is a valid URL");
        Bot::new(TEST_TOKEN).set_api_url(url)
    }

    /// Answer sendMessage with a delivered private-chat message
    pub async fn mock_send_message_ok(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": sent_message(42, "ok"),
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer sendMessage with a Bot API error
    pub async fn mock_send_message_error(&self, description: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": description,
            })))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every sendMessage call received so far
    pub async fn sent_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}

fn sent_message(chat_id: i64, text: &str) -> Value {
    json!({
        "message_id": 1,
        "date": 1_700_000_000,
        "chat": {
            "id": chat_id,
            "type": "private",
            "first_name": "Lena"
        },
        "from": {
            "id": 999,
            "is_bot": true,
            "first_name": "PlaceBot",
            "username": "place_bot"
        },
        "text": text
    })
}
