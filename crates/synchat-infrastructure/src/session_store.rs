//! Dual-write session persistence.
//!
//! The remote message table is authoritative when reachable; local device
//! storage is a degraded-mode mirror. The policy is concentrated here so the
//! fallback rules are explicit rather than scattered try/catch:
//!
//! - read: remote wins and refreshes the mirror; remote failure or an empty
//!   remote result falls back to the mirror
//! - write: mirror first (the session must reflect the latest state even if
//!   the remote write fails), then best-effort remote
//! - reset: clear both, tolerating remote failure (at-least-once cleanup)
//!
//! Remote failures are logged, never surfaced; the conversation always
//! appears to proceed.

use std::sync::Arc;
use synchat_core::error::Result;
use synchat_core::session::{ChatMode, LocalStore, Message, MessageStore};
use tracing::{debug, warn};
use uuid::Uuid;

/// Mode-keyed session identity and message history over a remote store and
/// a local fallback store.
pub struct SessionStore {
    remote: Arc<dyn MessageStore>,
    local: Arc<dyn LocalStore>,
}

impl SessionStore {
    pub fn new(remote: Arc<dyn MessageStore>, local: Arc<dyn LocalStore>) -> Self {
        Self { remote, local }
    }

    /// Returns the session id for `mode`, generating and persisting a fresh
    /// v4 UUID on first use. The id is persisted before it is returned.
    pub async fn get_or_create_session_id(&self, mode: ChatMode) -> Result<Uuid> {
        if let Some(existing) = self.local.session_id(mode).await? {
            return Ok(existing);
        }
        let fresh = Uuid::new_v4();
        self.local.set_session_id(mode, fresh).await?;
        debug!(%fresh, %mode, "created session id");
        Ok(fresh)
    }

    /// Loads the history for a session, remote-first.
    ///
    /// A successful non-empty remote read is authoritative and refreshes the
    /// local mirror, so the mirror never goes silently stale. On remote
    /// failure or an empty remote result the mirrored history for `mode` is
    /// returned instead. Never fails the conversation: a broken mirror
    /// degrades to an empty history.
    pub async fn load_history(&self, mode: ChatMode, session_id: Uuid) -> Vec<Message> {
        match self.remote.list_by_session(session_id).await {
            Ok(messages) if !messages.is_empty() => {
                if let Err(e) = self.local.put_history(mode, &messages).await {
                    warn!(error = %e, %mode, "failed to refresh local mirror");
                }
                messages
            }
            Ok(_) => self.local_fallback(mode).await,
            Err(e) => {
                warn!(error = %e, %session_id, "remote read failed, falling back to mirror");
                self.local_fallback(mode).await
            }
        }
    }

    /// Appends a message: local mirror first, then best-effort remote.
    ///
    /// The mirror write happens before the remote attempt begins (optimistic
    /// write). A remote failure is logged and accepted as inconsistency; it
    /// never blocks the conversation. There is no retry policy.
    pub async fn append(&self, mode: ChatMode, message: &Message) -> Result<()> {
        self.local.append_history(mode, message).await?;
        if let Err(e) = self.remote.insert(message).await {
            warn!(error = %e, message_id = %message.id, "remote write failed, kept local only");
        }
        Ok(())
    }

    /// Clears the history for a session in both stores.
    ///
    /// The local mirror is cleared even when the remote delete fails
    /// (at-least-once cleanup, not atomic). The session id mapping is
    /// retained; a session keeps its identity across resets.
    pub async fn reset(&self, mode: ChatMode, session_id: Uuid) {
        if let Err(e) = self.local.clear_history(mode).await {
            warn!(error = %e, %mode, "failed to clear local mirror");
        }
        if let Err(e) = self.remote.delete_by_session(session_id).await {
            warn!(error = %e, %session_id, "remote delete failed, local state cleared anyway");
        }
    }

    async fn local_fallback(&self, mode: ChatMode) -> Vec<Message> {
        match self.local.history(mode).await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, %mode, "local mirror unreadable, starting empty");
                Vec::new()
            }
        }
    }
}
