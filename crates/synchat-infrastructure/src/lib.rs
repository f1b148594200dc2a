//! Synchat infrastructure: storage backends and the dual-write policy.

pub mod atomic_toml;
pub mod config;
pub mod local_file;
pub mod memory;
pub mod session_store;

pub use config::{InMemoryConfigProvider, TomlConfigProvider};
pub use local_file::TomlLocalStore;
pub use memory::{InMemoryLocalStore, InMemoryMessageStore};
pub use session_store::SessionStore;
