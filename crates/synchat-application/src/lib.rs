//! Synchat application layer: timing, presence, and conversation
//! orchestration.

pub mod manager;
pub mod presence;
pub mod timing;

pub use manager::ChatSessionManager;
pub use presence::{PresenceConfig, PresenceTracker};
pub use timing::ResponseTimingSimulator;
