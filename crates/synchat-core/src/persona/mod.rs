//! Persona domain: model, presets, directory, and scheduling.

pub mod directory;
pub mod model;
pub mod preset;
pub mod scheduler;

pub use directory::PersonaDirectory;
pub use model::{Persona, PersonaKind};
pub use preset::DEFAULT_PERSONAS;
pub use scheduler::{PersonaScheduler, select_active_persona};
