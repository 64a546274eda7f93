//! Dialogue state
//!
//! A user's position in the add-place dialogue is derived from two facts:
//! whether a live [`User`] record exists and which [`PlaceDraft`] step, if
//! any, is stored for them. [`DialogueState::resolve`] turns those into one
//! explicit variant the controller matches on.

use std::fmt;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::models::{Place, User};
use crate::utils::errors::{PlaceBotError, Result};

/// Progress of a place under construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftStep {
    AwaitingName,
    AwaitingPriority { name: String },
}

impl DraftStep {
    pub fn name(&self) -> &'static str {
        match self {
            DraftStep::AwaitingName => "awaiting_name",
            DraftStep::AwaitingPriority { .. } => "awaiting_priority",
        }
    }
}

/// A place being collected across dialogue turns, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDraft {
    pub user_id: i64,
    pub step: DraftStep,
    pub started_at: DateTime<Utc>,
}

impl PlaceDraft {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            step: DraftStep::AwaitingName,
            started_at: Utc::now(),
        }
    }

    /// Fill in the name as written; the draft must still be waiting for one
    pub fn with_name(self, name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(PlaceBotError::InvalidInput("Place name is empty".to_string()));
        }

        match self.step {
            DraftStep::AwaitingName => Ok(Self {
                step: DraftStep::AwaitingPriority {
                    name: name.to_string(),
                },
                ..self
            }),
            DraftStep::AwaitingPriority { .. } => Err(self.transition_error("name")),
        }
    }

    /// Complete the draft into a place owned by `user_id`
    pub fn into_place(self, priority: i32) -> Result<Place> {
        match self.step {
            DraftStep::AwaitingPriority { name } => Ok(Place::new(self.user_id, name, priority)),
            DraftStep::AwaitingName => Err(self.transition_error("place")),
        }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.started_at > ttl
    }

    fn transition_error(&self, to: &str) -> PlaceBotError {
        PlaceBotError::InvalidStateTransition {
            from: self.step.name().to_string(),
            to: to.to_string(),
        }
    }
}

/// Where a user stands in the add-place dialogue, with the records that
/// put them there
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueState {
    /// No live user record
    Unregistered,
    /// Registered, no draft in progress
    Idle { user: User },
    AwaitingName { user: User, draft: PlaceDraft },
    AwaitingPriority { user: User, draft: PlaceDraft },
}

impl DialogueState {
    /// A draft without a live user does not count
    pub fn resolve(user: Option<User>, draft: Option<PlaceDraft>) -> Self {
        match (user, draft) {
            (None, _) => DialogueState::Unregistered,
            (Some(user), None) => DialogueState::Idle { user },
            (Some(user), Some(draft)) => match draft.step {
                DraftStep::AwaitingName => DialogueState::AwaitingName { user, draft },
                DraftStep::AwaitingPriority { .. } => DialogueState::AwaitingPriority { user, draft },
            },
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            DialogueState::Unregistered => None,
            DialogueState::Idle { user }
            | DialogueState::AwaitingName { user, .. }
            | DialogueState::AwaitingPriority { user, .. } => Some(user),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialogueState::Unregistered => "unregistered",
            DialogueState::Idle { .. } => "idle",
            DialogueState::AwaitingName { .. } => "awaiting_name",
            DialogueState::AwaitingPriority { .. } => "awaiting_priority",
        }
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
