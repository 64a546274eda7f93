//! Outbound replies

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use crate::utils::errors::Result;

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Sends replies through the Telegram Bot API
#[derive(Debug, Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text.to_string()).await?;
        Ok(())
    }
}
