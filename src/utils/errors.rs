//! Error handling for PlaceBot
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for PlaceBot application
#[derive(Error, Debug)]
pub enum PlaceBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("More than one {entity} matched a query expecting at most one row")]
    Ambiguous { entity: &'static str },

    #[error("Unknown column {column} for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PlaceBot operations
pub type Result<T> = std::result::Result<T, PlaceBotError>;

impl PlaceBotError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PlaceBotError::Database(_) => false,
            PlaceBotError::Migration(_) => false,
            PlaceBotError::Telegram(_) => true,
            PlaceBotError::ConfigLoad(_) => false,
            PlaceBotError::Config(_) => false,
            PlaceBotError::Ambiguous { .. } => false,
            PlaceBotError::UnknownColumn { .. } => false,
            PlaceBotError::InvalidStateTransition { .. } => false,
            PlaceBotError::InvalidInput(_) => true,
            PlaceBotError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlaceBotError::Database(_) => ErrorSeverity::Critical,
            PlaceBotError::Migration(_) => ErrorSeverity::Critical,
            PlaceBotError::ConfigLoad(_) => ErrorSeverity::Critical,
            PlaceBotError::Config(_) => ErrorSeverity::Critical,
            PlaceBotError::Telegram(_) => ErrorSeverity::Warning,
            PlaceBotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
