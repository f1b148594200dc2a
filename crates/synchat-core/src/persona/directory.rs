//! Persona directory.
//!
//! Loads the ordered persona list from the injected [`ConfigProvider`].
//! List order is meaningful: among default personas, the topmost whose
//! window contains the current time wins, so the directory never reorders
//! what the configuration surface saved.

use super::model::{Persona, PersonaKind};
use super::preset::DEFAULT_PERSONAS;
use crate::config::{ConfigProvider, PERSONAS_KEY};
use std::sync::Arc;
use tracing::warn;

/// Read access to the configured persona roster.
///
/// The roster is re-read on every call rather than cached: the configuration
/// surface may edit personas at any time and edits must take effect on the
/// next turn.
pub struct PersonaDirectory {
    config: Arc<dyn ConfigProvider>,
}

impl PersonaDirectory {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self { config }
    }

    /// Loads the current persona roster.
    ///
    /// Falls back to the built-in presets when no roster is configured or
    /// the configured value cannot be decoded. Never fails.
    pub async fn load(&self) -> Vec<Persona> {
        let value = match self.config.get(PERSONAS_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => return DEFAULT_PERSONAS.clone(),
            Err(e) => {
                warn!(error = %e, "persona config unavailable, using presets");
                return DEFAULT_PERSONAS.clone();
            }
        };

        match serde_json::from_value::<Vec<Persona>>(value) {
            Ok(personas) if !personas.is_empty() => personas,
            Ok(_) => DEFAULT_PERSONAS.clone(),
            Err(e) => {
                warn!(error = %e, "persona config undecodable, using presets");
                DEFAULT_PERSONAS.clone()
            }
        }
    }

    /// Loads the configured qualification persona, if any.
    pub async fn qualification_persona(&self) -> Option<Persona> {
        self.load()
            .await
            .into_iter()
            .find(|p| p.kind == PersonaKind::Qualification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChatError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapConfig {
        entries: Mutex<HashMap<String, serde_json::Value>>,
        fail: bool,
    }

    impl MapConfig {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ConfigProvider for MapConfig {
        async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
            if self.fail {
                return Err(ChatError::store("settings table unreachable"));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: serde_json::Value) -> Result<()> {
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_config_falls_back_to_presets() {
        let directory = PersonaDirectory::new(Arc::new(MapConfig::new()));
        let personas = directory.load().await;
        assert_eq!(personas.len(), DEFAULT_PERSONAS.len());
        assert_eq!(personas[0].id, "max");
    }

    #[tokio::test]
    async fn unreachable_config_falls_back_to_presets() {
        let directory = PersonaDirectory::new(Arc::new(MapConfig::failing()));
        assert_eq!(directory.load().await.len(), DEFAULT_PERSONAS.len());
    }

    #[tokio::test]
    async fn configured_roster_wins_and_preserves_order() {
        let config = MapConfig::new();
        let roster = serde_json::json!([
            {
                "id": "b", "name": "B", "role": "Support", "type": "default",
                "intervalMin": 1, "intervalMax": 2, "welcomeMessage": "hi"
            },
            {
                "id": "a", "name": "A", "role": "Support", "type": "default",
                "intervalMin": 1, "intervalMax": 2, "welcomeMessage": "hi"
            }
        ]);
        config.set(PERSONAS_KEY, roster).await.unwrap();

        let directory = PersonaDirectory::new(Arc::new(config));
        let personas = directory.load().await;
        let ids: Vec<_> = personas.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn hot_edits_take_effect_on_next_load() {
        let config = Arc::new(MapConfig::new());
        let directory = PersonaDirectory::new(config.clone());
        assert_eq!(directory.load().await[0].id, "max");

        let roster = serde_json::json!([
            {
                "id": "edited", "name": "Edited", "role": "Support", "type": "qualification",
                "intervalMin": 1, "intervalMax": 2, "welcomeMessage": "hi"
            }
        ]);
        config.set(PERSONAS_KEY, roster).await.unwrap();
        assert_eq!(directory.load().await[0].id, "edited");
        assert_eq!(
            directory.qualification_persona().await.unwrap().id,
            "edited"
        );
    }
}
