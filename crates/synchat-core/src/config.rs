//! Configuration provider abstraction.
//!
//! Chat configuration (persona list, shared knowledge, qualifier method) is
//! edited by an external surface and read by the engine on every scheduling
//! or timing decision. The provider is injected so the engine never reaches
//! for ambient storage, and tests can substitute an in-memory fake.

use crate::error::Result;
use async_trait::async_trait;

/// Settings key for the ordered persona list (JSON array of [`crate::persona::Persona`]).
pub const PERSONAS_KEY: &str = "personas";

/// Settings key for the knowledge text shared across all personas.
pub const UNIVERSAL_KNOWLEDGE_KEY: &str = "universal_knowledge";

/// Settings key for the lead qualifier method (`"chat"` or `"form"`).
pub const QUALIFIER_METHOD_KEY: &str = "qualifier_method";

/// A generic `{key, value}` settings table.
///
/// Keys are opaque strings; values are JSON documents. Implementations may be
/// backed by a remote settings table, a local file, or memory.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Stores `value` under `key`, replacing any existing value.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<()>;
}
