//! PlaceBot Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use anyhow::Context;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::{prelude::*, types::Update};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use PlaceBot::{
    config::Settings,
    database::{create_pool, run_migrations, CommonRepository},
    handlers::{Command, DialogueController, IncomingMessage, TelegramMessenger},
    state::InMemoryDraftStore,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Held until shutdown so buffered file logs are flushed
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", PlaceBot::info());

    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;
    run_migrations(&pool).await?;

    let bot = Bot::new(&settings.bot.token);
    bot.set_my_commands(Command::bot_commands())
        .await
        .context("Failed to register the command menu")?;

    let controller = Arc::new(DialogueController::new(
        Arc::new(CommonRepository::new(pool)),
        Arc::new(InMemoryDraftStore::with_ttl(settings.dialogue.draft_ttl())),
        Arc::new(TelegramMessenger::new(bot.clone())),
    ));

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![controller])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("PlaceBot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message().endpoint(handle_message)
}

/// Every text message is one dialogue turn
async fn handle_message(msg: Message, controller: Arc<DialogueController>) -> HandlerResult {
    match IncomingMessage::from_telegram(&msg) {
        Some(message) => controller.handle(&message).await,
        None => warn!(chat_id = msg.chat.id.0, "Ignoring message without text or sender"),
    }
    Ok(())
}
