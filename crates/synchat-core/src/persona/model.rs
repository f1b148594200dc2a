//! Persona domain model.
//!
//! Represents the simulated agent identities that participate in widget
//! conversations. Each persona has a display identity, reply-timing
//! parameters, and an optional daily activity window.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// The conversational track a persona serves.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKind {
    /// Runs the scripted lead-qualification flow.
    Qualification,
    /// Answers general inquiries with a canned acknowledgement.
    Default,
}

impl Default for PersonaKind {
    fn default() -> Self {
        PersonaKind::Default
    }
}

/// A configured agent identity.
///
/// Personas are edited externally as JSON, so the serde layout follows the
/// original camelCase field names. `start_time`/`end_time` are local
/// time-of-day boundaries; a window with `start_time > end_time` wraps past
/// midnight (active overnight). A persona without a window is treated as
/// always active.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Stable identifier (slug or UUID, chosen by the editor).
    pub id: String,
    /// Display name shown in the widget header.
    pub name: String,
    /// Role or title shown next to the name.
    pub role: String,
    /// Conversational track served by this persona.
    #[serde(rename = "type", default)]
    pub kind: PersonaKind,
    /// Behavioral instructions (kept for the configuration surface).
    #[serde(default)]
    pub instructions: String,
    /// Persona-specific knowledge (kept for the configuration surface).
    #[serde(default)]
    pub knowledge: String,
    /// Lower bound of the simulated reply delay, in milliseconds.
    pub interval_min: u64,
    /// Upper bound of the simulated reply delay, in milliseconds.
    pub interval_max: u64,
    /// First agent message seeded into a fresh session.
    pub welcome_message: String,
    /// Start of the daily activity window (local time of day).
    #[serde(default, with = "hhmm_option")]
    pub start_time: Option<NaiveTime>,
    /// End of the daily activity window (local time of day).
    #[serde(default, with = "hhmm_option")]
    pub end_time: Option<NaiveTime>,
}

impl Persona {
    /// Tests whether this persona's activity window contains `time`.
    ///
    /// The window is half-open, `[start, end)`. When `start > end` the
    /// active interval wraps midnight: `[start, 24:00) ∪ [00:00, end)`.
    /// A persona with either boundary missing is always active.
    pub fn window_contains(&self, time: NaiveTime) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                if start <= end {
                    time >= start && time < end
                } else {
                    time >= start || time < end
                }
            }
            _ => true,
        }
    }
}

/// Serde codec for optional `"HH:MM"` time-of-day strings.
///
/// The configuration surface writes `<input type="time">` values, so the
/// canonical form is `"07:00"`. Seconds are accepted on read for tolerance.
mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", s, e))),
        }
    }
}
