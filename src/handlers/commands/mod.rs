//! Command handlers module
//!
//! This module contains handlers for the bot commands: /start, /add_place
//! and /places

pub mod add_place;
pub mod places;
pub mod start;

use teloxide::utils::command::BotCommands;

/// All available bot commands
#[derive(BotCommands, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "PlaceBot commands:")]
pub enum Command {
    #[command(description = "Register and show the welcome message")]
    Start,
    #[command(description = "Add a place to visit")]
    AddPlace,
    #[command(description = "List all places by priority")]
    Places,
}

impl Command {
    /// Text that triggers the command
    pub fn trigger(self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::AddPlace => "/add_place",
            Command::Places => "/places",
        }
    }
}

/// One inbound text, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Text(String),
}

impl Input {
    /// `/start` matches as a prefix, `/add_place` and `/places` only
    /// exactly; everything else is free text
    pub fn parse(text: &str) -> Self {
        if text.starts_with(Command::Start.trigger()) {
            Input::Command(Command::Start)
        } else if text == Command::AddPlace.trigger() {
            Input::Command(Command::AddPlace)
        } else if text == Command::Places.trigger() {
            Input::Command(Command::Places)
        } else {
            Input::Text(text.to_string())
        }
    }
}
