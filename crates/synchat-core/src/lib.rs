//! Synchat core: domain models and pure conversational logic.
//!
//! Everything here is storage- and runtime-agnostic: the clock, the persona
//! roster and its time-of-day scheduler, the scripted qualification flow,
//! and the traits the infrastructure crate implements.

pub mod clock;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod persona;
pub mod session;

// Re-export common error type
pub use error::{ChatError, Result};
