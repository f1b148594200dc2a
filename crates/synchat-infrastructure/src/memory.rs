//! In-memory storage backends.
//!
//! The in-memory message store doubles as the test stand-in for the remote
//! table: its availability can be toggled to exercise the degraded-mode
//! paths of the dual-write policy.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use synchat_core::error::{ChatError, Result};
use synchat_core::session::{ChatMode, LocalStore, Message, MessageStore, sort_by_created_at};
use uuid::Uuid;

/// An in-memory message table keyed by session.
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<Message>>,
    available: AtomicBool,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates remote (un)availability; while unavailable every operation
    /// fails with a store error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ChatError::store("remote store unavailable"))
        }
    }

    /// Total number of stored messages across all sessions.
    pub fn len(&self) -> usize {
        self.messages.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: &Message) -> Result<()> {
        self.check_available()?;
        self.messages.write().unwrap().push(message.clone());
        Ok(())
    }

    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<Message>> {
        self.check_available()?;
        let mut matching: Vec<Message> = self
            .messages
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        sort_by_created_at(&mut matching);
        Ok(matching)
    }

    async fn delete_by_session(&self, session_id: Uuid) -> Result<()> {
        self.check_available()?;
        self.messages
            .write()
            .unwrap()
            .retain(|m| m.session_id != session_id);
        Ok(())
    }
}

/// An in-memory stand-in for local device storage.
#[derive(Default)]
pub struct InMemoryLocalStore {
    sessions: RwLock<HashMap<ChatMode, Uuid>>,
    histories: RwLock<HashMap<ChatMode, Vec<Message>>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn session_id(&self, mode: ChatMode) -> Result<Option<Uuid>> {
        Ok(self.sessions.read().unwrap().get(&mode).copied())
    }

    async fn set_session_id(&self, mode: ChatMode, session_id: Uuid) -> Result<()> {
        self.sessions.write().unwrap().insert(mode, session_id);
        Ok(())
    }

    async fn history(&self, mode: ChatMode) -> Result<Vec<Message>> {
        let mut history = self
            .histories
            .read()
            .unwrap()
            .get(&mode)
            .cloned()
            .unwrap_or_default();
        sort_by_created_at(&mut history);
        Ok(history)
    }

    async fn put_history(&self, mode: ChatMode, messages: &[Message]) -> Result<()> {
        self.histories
            .write()
            .unwrap()
            .insert(mode, messages.to_vec());
        Ok(())
    }

    async fn append_history(&self, mode: ChatMode, message: &Message) -> Result<()> {
        self.histories
            .write()
            .unwrap()
            .entry(mode)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn clear_history(&self, mode: ChatMode) -> Result<()> {
        self.histories.write().unwrap().remove(&mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn message_store_lists_only_the_requested_session() {
        let store = InMemoryMessageStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.insert(&Message::user(a, "for a")).await.unwrap();
        store.insert(&Message::user(b, "for b")).await.unwrap();

        let listed = store.list_by_session(a).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "for a");
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let store = InMemoryMessageStore::new();
        store.set_available(false);
        let session = Uuid::new_v4();
        assert!(store.insert(&Message::user(session, "x")).await.is_err());
        assert!(store.list_by_session(session).await.is_err());
        assert!(store.delete_by_session(session).await.is_err());

        store.set_available(true);
        assert!(store.insert(&Message::user(session, "x")).await.is_ok());
    }

    #[tokio::test]
    async fn local_store_keeps_modes_separate() {
        let store = InMemoryLocalStore::new();
        let q = Uuid::new_v4();
        store
            .set_session_id(ChatMode::Qualification, q)
            .await
            .unwrap();
        assert_eq!(
            store.session_id(ChatMode::Qualification).await.unwrap(),
            Some(q)
        );
        assert_eq!(store.session_id(ChatMode::Default).await.unwrap(), None);

        store
            .append_history(ChatMode::Default, &Message::user(q, "hello"))
            .await
            .unwrap();
        assert!(
            store
                .history(ChatMode::Qualification)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(store.history(ChatMode::Default).await.unwrap().len(), 1);
    }
}
