//! TOML-file-backed local store.
//!
//! The Rust analog of the widget's device-local persistent storage: one
//! small state document holding the mode→session-id map and the mirrored
//! histories, written atomically on every mutation.

use crate::atomic_toml::AtomicTomlFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use synchat_core::error::{ChatError, Result};
use synchat_core::session::{ChatMode, LocalStore, Message, sort_by_created_at};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalStateDoc {
    /// Session id per mode, keyed by the mode's stable string form.
    #[serde(default)]
    sessions: HashMap<String, Uuid>,
    /// Mirrored message history per mode.
    #[serde(default)]
    histories: HashMap<String, Vec<Message>>,
}

/// Local device storage persisted to a single TOML file.
pub struct TomlLocalStore {
    file: AtomicTomlFile<LocalStateDoc>,
    // Serializes read-modify-write cycles against the state file.
    write_lock: Mutex<()>,
}

impl TomlLocalStore {
    /// Creates a store at the default data path
    /// (`<data_dir>/synchat/state.toml`).
    pub fn new() -> Result<Self> {
        let path = dirs::data_dir()
            .map(|dir| dir.join("synchat").join("state.toml"))
            .ok_or_else(|| ChatError::config("cannot determine data directory"))?;
        Ok(Self::with_path(path))
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            write_lock: Mutex::new(()),
        }
    }

    fn load_doc(&self) -> Result<LocalStateDoc> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut LocalStateDoc),
    {
        let _guard = self.write_lock.lock().map_err(|_| {
            ChatError::internal("local state lock poisoned")
        })?;
        let mut doc = self.load_doc()?;
        mutate(&mut doc);
        self.file.save(&doc)
    }
}

#[async_trait]
impl LocalStore for TomlLocalStore {
    async fn session_id(&self, mode: ChatMode) -> Result<Option<Uuid>> {
        Ok(self.load_doc()?.sessions.get(mode.as_str()).copied())
    }

    async fn set_session_id(&self, mode: ChatMode, session_id: Uuid) -> Result<()> {
        self.update(|doc| {
            doc.sessions.insert(mode.as_str().to_string(), session_id);
        })
    }

    async fn history(&self, mode: ChatMode) -> Result<Vec<Message>> {
        let mut history = self
            .load_doc()?
            .histories
            .get(mode.as_str())
            .cloned()
            .unwrap_or_default();
        sort_by_created_at(&mut history);
        Ok(history)
    }

    async fn put_history(&self, mode: ChatMode, messages: &[Message]) -> Result<()> {
        self.update(|doc| {
            doc.histories
                .insert(mode.as_str().to_string(), messages.to_vec());
        })
    }

    async fn append_history(&self, mode: ChatMode, message: &Message) -> Result<()> {
        self.update(|doc| {
            doc.histories
                .entry(mode.as_str().to_string())
                .or_default()
                .push(message.clone());
        })
    }

    async fn clear_history(&self, mode: ChatMode) -> Result<()> {
        self.update(|doc| {
            doc.histories.remove(mode.as_str());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TomlLocalStore {
        TomlLocalStore::with_path(dir.path().join("state.toml"))
    }

    #[tokio::test]
    async fn session_id_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        {
            let store = store_in(&dir);
            store
                .set_session_id(ChatMode::Qualification, id)
                .await
                .unwrap();
        }
        let reopened = store_in(&dir);
        assert_eq!(
            reopened.session_id(ChatMode::Qualification).await.unwrap(),
            Some(id)
        );
        assert_eq!(reopened.session_id(ChatMode::Default).await.unwrap(), None);
    }

    #[tokio::test]
    async fn history_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let session = Uuid::new_v4();

        let welcome = Message::agent(session, "welcome");
        let reply = Message::user(session, "hi there");
        store
            .append_history(ChatMode::Default, &welcome)
            .await
            .unwrap();
        store
            .append_history(ChatMode::Default, &reply)
            .await
            .unwrap();

        let history = store_in(&dir).history(ChatMode::Default).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "welcome");
        assert_eq!(history[1].text, "hi there");
    }

    #[tokio::test]
    async fn clear_history_only_touches_the_given_mode() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let session = Uuid::new_v4();

        store
            .append_history(ChatMode::Default, &Message::user(session, "d"))
            .await
            .unwrap();
        store
            .append_history(ChatMode::Qualification, &Message::user(session, "q"))
            .await
            .unwrap();

        store.clear_history(ChatMode::Default).await.unwrap();
        assert!(store.history(ChatMode::Default).await.unwrap().is_empty());
        assert_eq!(
            store.history(ChatMode::Qualification).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn put_history_replaces_the_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let session = Uuid::new_v4();

        store
            .append_history(ChatMode::Default, &Message::user(session, "stale"))
            .await
            .unwrap();
        let fresh = vec![
            Message::agent(session, "one"),
            Message::user(session, "two"),
        ];
        store.put_history(ChatMode::Default, &fresh).await.unwrap();

        let history = store.history(ChatMode::Default).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "one");
    }
}
