//! Built-in persona presets.
//!
//! Used whenever no persona list is configured, so the widget can always
//! hold a conversation. The copy matches the shipped configuration surface
//! defaults.

use super::model::{Persona, PersonaKind};
use chrono::NaiveTime;
use once_cell::sync::Lazy;

fn hhmm(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

/// The shipped persona roster: one qualifier plus two ranked defaults.
pub static DEFAULT_PERSONAS: Lazy<Vec<Persona>> = Lazy::new(|| {
    vec![
        Persona {
            id: "max".to_string(),
            name: "Max".to_string(),
            role: "Client Success".to_string(),
            kind: PersonaKind::Qualification,
            instructions: "You are Max, a Client Success Manager at Synoxus. Your goal is to \
                           qualify leads by asking about their current video output, target \
                           output, budget, and goals. Be friendly, professional, and concise."
                .to_string(),
            knowledge: "Synoxus offers high-ticket lead generation services. We guarantee 30+ \
                        leads in 90 days or we work for free. We help with content ideation, \
                        packaging (thumbnails/titles), and conversion assets (VSLs)."
                .to_string(),
            interval_min: 1500,
            interval_max: 2500,
            welcome_message: "Hey! Max here. Glad you're interested. Before we start, what's \
                              your best email or phone number?"
                .to_string(),
            start_time: hhmm(7, 0),
            end_time: hhmm(19, 0),
        },
        Persona {
            id: "yohan".to_string(),
            name: "Yohan".to_string(),
            role: "Founder".to_string(),
            kind: PersonaKind::Default,
            instructions: "You are Yohan, the founder of Synoxus. You are busy but helpful. You \
                           answer questions directly and encourage people to book a call or \
                           check out the case studies."
                .to_string(),
            knowledge: "Synoxus scales creators on Skool. We helped Nick Saraev reach #1 on \
                        Skool. We focus on 'Psychological Packaging' and 'Conversion Cascades'."
                .to_string(),
            interval_min: 2000,
            interval_max: 4000,
            welcome_message: "Hey, Yohan here. Let me know if you have any questions. If I'm \
                              free I'll try to reply as fast as I can."
                .to_string(),
            start_time: hhmm(9, 0),
            end_time: hhmm(17, 0),
        },
        Persona {
            id: "laura".to_string(),
            name: "Laura".to_string(),
            role: "Yohan's Assistant".to_string(),
            kind: PersonaKind::Default,
            instructions: "You are Laura, Yohan's assistant. You handle inquiries when Yohan is \
                           offline. You are polite, organized, and helpful."
                .to_string(),
            knowledge: "Yohan is currently offline. You can take messages or direct people to \
                        the calendar."
                .to_string(),
            interval_min: 1000,
            interval_max: 2000,
            welcome_message: "Hi, I'm Laura, Yohan's assistant. Yohan is currently offline. How \
                              can I help you today?"
                .to_string(),
            start_time: hhmm(19, 0),
            end_time: hhmm(7, 0),
        },
    ]
});

/// The built-in qualification persona, used when none is configured.
pub fn builtin_qualifier() -> Persona {
    DEFAULT_PERSONAS
        .iter()
        .find(|p| p.kind == PersonaKind::Qualification)
        .cloned()
        .expect("preset roster contains a qualification persona")
}
