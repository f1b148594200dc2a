//! Session identity types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The conversational track a session runs on.
///
/// Each mode maps to its own persistent session identity, so switching the
/// widget between general chat and the lead-intake script never mixes
/// histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// The scripted lead-qualification flow.
    Qualification,
    /// General inquiry chat.
    Default,
}

impl ChatMode {
    /// Stable string form, used as a storage key suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Qualification => "qualification",
            ChatMode::Default => "default",
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-device, per-mode conversation identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Cryptographically random identifier for the message history.
    pub session_id: Uuid,
    /// The track this session runs on.
    pub mode: ChatMode,
}

impl Session {
    pub fn new(session_id: Uuid, mode: ChatMode) -> Self {
        Self { session_id, mode }
    }
}
