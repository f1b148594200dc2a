//! Atomic TOML file persistence.
//!
//! A thin layer for safe writes to the local state file: serialize to a
//! temporary sibling, fsync, then rename over the target. A crash mid-write
//! leaves either the old document or the new one, never a torn file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::PathBuf;
use synchat_core::error::Result;

/// A handle to a TOML document persisted with tmp-file + atomic rename.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// Loads and deserializes the document.
    ///
    /// Returns `None` when the file does not exist or is empty.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes and saves the document atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(data)?;
        let tmp_path = self.path.with_extension("toml.tmp");

        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: String,
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let file: AtomicTomlFile<Doc> = AtomicTomlFile::new(dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let file: AtomicTomlFile<Doc> = AtomicTomlFile::new(dir.path().join("nested/state.toml"));
        let doc = Doc {
            value: "hello".to_string(),
        };
        file.save(&doc).unwrap();
        assert_eq!(file.load().unwrap(), Some(doc));
    }

    #[test]
    fn save_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let file: AtomicTomlFile<Doc> = AtomicTomlFile::new(dir.path().join("state.toml"));
        file.save(&Doc {
            value: "first".to_string(),
        })
        .unwrap();
        file.save(&Doc {
            value: "second".to_string(),
        })
        .unwrap();
        assert_eq!(file.load().unwrap().unwrap().value, "second");
    }
}
