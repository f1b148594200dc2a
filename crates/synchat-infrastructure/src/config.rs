//! Configuration provider implementations.
//!
//! The settings table is a generic `{key, value}` map. Values are stored as
//! JSON text inside the TOML document so arbitrary JSON (including nulls)
//! round-trips cleanly.

use crate::atomic_toml::AtomicTomlFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use synchat_core::config::ConfigProvider;
use synchat_core::error::{ChatError, Result};

/// An in-memory settings table, for embedding and tests.
#[derive(Default)]
pub struct InMemoryConfigProvider {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigProvider for InMemoryConfigProvider {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigDoc {
    /// JSON-encoded value per settings key.
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// A settings table persisted to a TOML file.
pub struct TomlConfigProvider {
    file: AtomicTomlFile<ConfigDoc>,
    write_lock: Mutex<()>,
}

impl TomlConfigProvider {
    /// Creates a provider at the default config path
    /// (`<config_dir>/synchat/config.toml`).
    pub fn new() -> Result<Self> {
        let path = dirs::config_dir()
            .map(|dir| dir.join("synchat").join("config.toml"))
            .ok_or_else(|| ChatError::config("cannot determine config directory"))?;
        Ok(Self::with_path(path))
    }

    /// Creates a provider at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ConfigProvider for TomlConfigProvider {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let doc = self.file.load()?.unwrap_or_default();
        match doc.entries.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ChatError::internal("config lock poisoned"))?;
        let mut doc = self.file.load()?.unwrap_or_default();
        doc.entries
            .insert(key.to_string(), serde_json::to_string(&value)?);
        self.file.save(&doc)
    }
}
