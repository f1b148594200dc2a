//! The scripted qualification flow.
//!
//! A linear, non-branching script driven by pattern-matching the *agent's
//! own* last utterance, not by parsing user input. User replies are stored
//! but never alter the trajectory. The step is recomputed on every turn from
//! the last agent message, which keeps the flow stateless with respect to
//! storage.
//!
//! The transitions are held in one priority-ordered table so the full set of
//! distinguishing patterns is visible in one place. If two scripted replies
//! ever came to share a pattern, transitions would misfire; the
//! `patterns_are_pairwise_distinct` test locks this down.

use crate::persona::Persona;

/// Where the qualification script stands, derived from the last agent
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// No agent message beyond the welcome; the visitor owes contact info.
    AwaitingContact,
    /// The agent just asked for current monthly output.
    AskedCurrentVolume,
    /// The agent just asked for target monthly output.
    AskedTargetVolume,
    /// The agent just asked for the monthly budget.
    AskedBudget,
    /// The agent just asked for the channel link.
    AskedChannel,
    /// The agent just asked for the channel's main goals.
    AskedGoals,
    /// The last agent message matched no scripted pattern (includes the
    /// terminal acknowledgement, which is absorbing through this state).
    Unclassified,
}

/// Priority-ordered `(pattern, state)` table; first substring match wins.
/// Matching is case-sensitive.
const TRANSITIONS: &[(&str, FlowState)] = &[
    ("currently post", FlowState::AskedCurrentVolume),
    ("WANT to post", FlowState::AskedTargetVolume),
    ("monthly budget", FlowState::AskedBudget),
    ("channel link", FlowState::AskedChannel),
    ("main goals", FlowState::AskedGoals),
];

const ASK_CURRENT_VOLUME: &str =
    "Perfect, thanks! First question: how many videos per month do you currently post?";
const ASK_TARGET_VOLUME: &str =
    "Got it. And how many videos per month do you WANT to post?";
const ASK_BUDGET: &str =
    "Nice. What's your monthly budget for growing the channel?";
const ASK_CHANNEL: &str =
    "Great. Could you drop your channel link so I can take a look?";
const ASK_GOALS: &str =
    "Thanks! Last one: what are your main goals for the channel?";
const ACKNOWLEDGEMENT: &str =
    "Awesome, that's everything I need. I've passed your details along and \
     we'll follow up with you shortly!";
const FALLBACK: &str = "Thanks! Is there anything else you'd like to add?";

/// Budget ranges from the application form, offered as quick replies.
const BUDGET_OPTIONS: &[&str] = &["$1k-$3k", "$3k-$5k", "$5k-$10k", "$10k+"];
const GOAL_OPTIONS: &[&str] = &["Lead generation", "Brand awareness", "Ad revenue"];

/// Classifies the last agent message into a flow state.
///
/// `last_agent_text` is `None` when no agent message exists yet. A message
/// equal to the persona's welcome also counts as awaiting contact, since the
/// welcome asks for an email or phone number and carries no scripted
/// pattern.
pub fn classify(last_agent_text: Option<&str>, welcome_message: &str) -> FlowState {
    let text = match last_agent_text {
        None => return FlowState::AwaitingContact,
        Some(text) => text,
    };
    if text == welcome_message {
        return FlowState::AwaitingContact;
    }
    for (pattern, state) in TRANSITIONS {
        if text.contains(pattern) {
            return *state;
        }
    }
    FlowState::Unclassified
}

/// Returns the scripted reply for the current state.
///
/// Each reply advances the script by one step because it contains the next
/// state's distinguishing pattern. The acknowledgement contains none, so
/// the terminal state is absorbing: every turn after it classifies as
/// [`FlowState::Unclassified`] and yields the generic fallback. Never errors.
pub fn next_reply(state: FlowState) -> &'static str {
    match state {
        FlowState::AwaitingContact => ASK_CURRENT_VOLUME,
        FlowState::AskedCurrentVolume => ASK_TARGET_VOLUME,
        FlowState::AskedTargetVolume => ASK_BUDGET,
        FlowState::AskedBudget => ASK_CHANNEL,
        FlowState::AskedChannel => ASK_GOALS,
        FlowState::AskedGoals => ACKNOWLEDGEMENT,
        FlowState::Unclassified => FALLBACK,
    }
}

/// Contextual quick-reply suggestions for the current state.
pub fn quick_replies(state: FlowState) -> &'static [&'static str] {
    match state {
        FlowState::AskedBudget => BUDGET_OPTIONS,
        FlowState::AskedGoals => GOAL_OPTIONS,
        _ => &[],
    }
}

/// The fixed default-mode acknowledgement naming the active persona.
pub fn default_mode_reply(persona: &Persona) -> String {
    format!(
        "Thanks for your message! {} will get back to you as soon as possible.",
        persona.name
    )
}
