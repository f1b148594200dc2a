//! Storage backend traits for session state.
//!
//! Two backends cooperate: a remote message table (authoritative when
//! reachable) and a local device store (session identity plus a degraded-mode
//! mirror of the history). The dual-write policy that combines them lives in
//! the infrastructure crate; these traits only define the per-backend
//! contract, each operation returning an explicit `Result`.

use super::message::Message;
use super::model::ChatMode;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// A remote table of messages addressable by session.
///
/// Implementations may be backed by a hosted database or memory. Absence of
/// the remote store must degrade, never crash: callers treat every error as
/// a signal to fall back to the local mirror.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inserts one message.
    async fn insert(&self, message: &Message) -> Result<()>;

    /// Lists all messages for a session, ordered by `created_at` ascending.
    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<Message>>;

    /// Deletes all messages for a session.
    async fn delete_by_session(&self, session_id: Uuid) -> Result<()>;
}

/// Local persistent device storage.
///
/// Owns the mode→session-id mapping (the source of truth for *which*
/// session a mode maps to) and keeps a mode-keyed mirror of the message
/// history for degraded-mode reads.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Returns the session id stored for `mode`, if any.
    async fn session_id(&self, mode: ChatMode) -> Result<Option<Uuid>>;

    /// Persists the session id for `mode`.
    async fn set_session_id(&self, mode: ChatMode, session_id: Uuid) -> Result<()>;

    /// Returns the mirrored history for `mode` (empty if none).
    async fn history(&self, mode: ChatMode) -> Result<Vec<Message>>;

    /// Replaces the mirrored history for `mode`.
    async fn put_history(&self, mode: ChatMode, messages: &[Message]) -> Result<()>;

    /// Appends one message to the mirrored history for `mode`.
    async fn append_history(&self, mode: ChatMode, message: &Message) -> Result<()>;

    /// Clears the mirrored history for `mode`.
    async fn clear_history(&self, mode: ChatMode) -> Result<()>;
}
