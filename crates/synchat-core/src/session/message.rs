//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human visitor.
    User,
    /// The simulated agent persona.
    Agent,
}

/// A single message in a session's append-only history.
///
/// Histories are ordered by `created_at` ascending regardless of the order
/// in which writes complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Message body.
    pub text: String,
    /// Author of the message.
    pub sender: Sender,
    /// The session this message belongs to.
    pub session_id: Uuid,
    /// Creation timestamp; defines history ordering.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(session_id: Uuid, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            session_id,
            created_at: Utc::now(),
        }
    }

    /// Creates a user message.
    pub fn user(session_id: Uuid, text: impl Into<String>) -> Self {
        Self::new(session_id, Sender::User, text)
    }

    /// Creates an agent message.
    pub fn agent(session_id: Uuid, text: impl Into<String>) -> Self {
        Self::new(session_id, Sender::Agent, text)
    }
}

/// Sorts a history into `created_at` ascending order.
pub fn sort_by_created_at(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}
