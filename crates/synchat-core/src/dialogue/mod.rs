//! Scripted conversation logic.

pub mod flow;

pub use flow::{FlowState, classify, default_mode_reply, next_reply, quick_replies};
