//! State management module
//!
//! This module holds the add-place dialogue state and the draft store

pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use context::{DialogueState, DraftStep, PlaceDraft};
pub use storage::{DraftStore, InMemoryDraftStore};
