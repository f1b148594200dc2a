//! Persona scheduling by time of day.
//!
//! Decides which single persona fronts the conversation at a given instant.
//! Selection is a pure function of the roster snapshot and "now"; the
//! [`PersonaScheduler`] wrapper re-reads the roster and the injected clock
//! on every call so config edits and the passage of time both take effect
//! on the next turn.

use super::directory::PersonaDirectory;
use super::model::{Persona, PersonaKind};
use super::preset::builtin_qualifier;
use crate::clock::Clock;
use crate::session::ChatMode;
use chrono::NaiveTime;
use std::sync::Arc;

/// Selects the active persona from a roster snapshot.
///
/// - Qualification mode: the first qualification-kind persona, or the
///   built-in qualifier if none is configured.
/// - Default mode: the first default-kind persona whose activity window
///   contains `time_of_day` ("topmost wins" — overlaps are resolved by list
///   order, deliberately not by narrowest window). If no window matches,
///   the last persona in the roster is the documented fallback.
pub fn select_active_persona(roster: &[Persona], mode: ChatMode, time_of_day: NaiveTime) -> Persona {
    match mode {
        ChatMode::Qualification => roster
            .iter()
            .find(|p| p.kind == PersonaKind::Qualification)
            .cloned()
            .unwrap_or_else(builtin_qualifier),
        ChatMode::Default => {
            let defaults: Vec<&Persona> = roster
                .iter()
                .filter(|p| p.kind == PersonaKind::Default)
                .collect();
            defaults
                .iter()
                .find(|p| p.window_contains(time_of_day))
                .copied()
                .or_else(|| defaults.last().copied())
                .or_else(|| roster.last())
                .cloned()
                .unwrap_or_else(builtin_qualifier)
        }
    }
}

/// Live persona selection against the configured roster and clock.
pub struct PersonaScheduler {
    directory: PersonaDirectory,
    clock: Arc<dyn Clock>,
}

impl PersonaScheduler {
    pub fn new(directory: PersonaDirectory, clock: Arc<dyn Clock>) -> Self {
        Self { directory, clock }
    }

    /// Returns the persona active right now for `mode`.
    ///
    /// Re-reads the roster so hot edits apply on the next turn.
    pub async fn select_active(&self, mode: ChatMode) -> Persona {
        let roster = self.directory.load().await;
        select_active_persona(&roster, mode, self.clock.now().time())
    }
}
