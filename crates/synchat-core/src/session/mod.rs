//! Session domain: identity, messages, and storage backend traits.

pub mod message;
pub mod model;
pub mod repository;

pub use message::{Message, Sender, sort_by_created_at};
pub use model::{ChatMode, Session};
pub use repository::{LocalStore, MessageStore};
