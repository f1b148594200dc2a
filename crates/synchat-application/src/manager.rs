//! Conversation orchestration.
//!
//! [`ChatSessionManager`] composes the persona scheduler, the scripted
//! flow, the timing simulator, the presence tracker, and the dual-write
//! session store into the observable conversation the widget renders.

use crate::presence::{PresenceConfig, PresenceTracker};
use crate::timing::ResponseTimingSimulator;
use std::sync::Arc;
use synchat_core::clock::Clock;
use synchat_core::config::ConfigProvider;
use synchat_core::dialogue;
use synchat_core::error::Result;
use synchat_core::persona::{Persona, PersonaDirectory, PersonaScheduler};
use synchat_core::session::{ChatMode, Message, Sender, Session, sort_by_created_at};
use synchat_infrastructure::SessionStore;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

/// State shared with in-flight reply tasks.
struct SharedState {
    store: Arc<SessionStore>,
    /// Read-through cache of the session history, kept consistent with the
    /// store's view on every append/reset/reload.
    messages: RwLock<Vec<Message>>,
    mode: RwLock<ChatMode>,
    session_id: RwLock<Uuid>,
}

impl SharedState {
    async fn append_message(&self, message: Message) {
        let mode = *self.mode.read().await;
        if let Err(e) = self.store.append(mode, &message).await {
            warn!(error = %e, message_id = %message.id, "failed to persist message");
        }
        let mut messages = self.messages.write().await;
        messages.push(message);
        sort_by_created_at(&mut messages);
    }
}

/// The root object of the conversational engine.
///
/// One manager runs one conversation (one mode at a time). User input comes
/// in through [`handle_user_message`](Self::handle_user_message); the
/// rendered state comes out of [`messages`](Self::messages),
/// [`typing`](Self::typing), and [`online`](Self::online).
pub struct ChatSessionManager {
    shared: Arc<SharedState>,
    scheduler: PersonaScheduler,
    timing: ResponseTimingSimulator,
    presence: PresenceTracker,
}

impl ChatSessionManager {
    /// Mounts a conversation: resolves the session identity for `mode`,
    /// loads history (remote-first with local fallback), and seeds the
    /// active persona's welcome message if the history is empty.
    pub async fn start(
        config: Arc<dyn ConfigProvider>,
        clock: Arc<dyn Clock>,
        store: Arc<SessionStore>,
        mode: ChatMode,
    ) -> Result<Self> {
        Self::start_with_presence(config, clock, store, mode, PresenceConfig::default()).await
    }

    /// Like [`start`](Self::start) with explicit presence timing.
    pub async fn start_with_presence(
        config: Arc<dyn ConfigProvider>,
        clock: Arc<dyn Clock>,
        store: Arc<SessionStore>,
        mode: ChatMode,
        presence_config: PresenceConfig,
    ) -> Result<Self> {
        let scheduler = PersonaScheduler::new(PersonaDirectory::new(config), clock);
        let session_id = store.get_or_create_session_id(mode).await?;
        let shared = Arc::new(SharedState {
            store,
            messages: RwLock::new(Vec::new()),
            mode: RwLock::new(mode),
            session_id: RwLock::new(session_id),
        });
        let manager = Self {
            shared,
            scheduler,
            timing: ResponseTimingSimulator::new(),
            presence: PresenceTracker::start(presence_config),
        };
        manager.reload_history().await;
        Ok(manager)
    }

    /// Accepts one user message and schedules the delayed agent reply.
    ///
    /// The user message lands in local state synchronously before its remote
    /// persistence attempt begins. The reply text is computed from the last
    /// agent message as of submit time; a second message arriving before
    /// this timer fires schedules its own reply from the same snapshot, and
    /// both are allowed to land.
    ///
    /// Returns the handle of the scheduled reply task.
    pub async fn handle_user_message(&self, text: impl Into<String>) -> Result<JoinHandle<()>> {
        let mode = *self.shared.mode.read().await;
        let session_id = *self.shared.session_id.read().await;
        // Re-read config here so persona edits apply to this very turn,
        // including the reply interval.
        let persona = self.scheduler.select_active(mode).await;

        self.shared
            .append_message(Message::user(session_id, text))
            .await;

        let reply_text = self.compute_reply(mode, &persona).await;
        let shared = self.shared.clone();
        Ok(self.timing.schedule(&persona, async move {
            let session_id = *shared.session_id.read().await;
            shared
                .append_message(Message::agent(session_id, reply_text))
                .await;
        }))
    }

    async fn compute_reply(&self, mode: ChatMode, persona: &Persona) -> String {
        match mode {
            ChatMode::Qualification => {
                let last_agent = self.last_agent_text().await;
                let state = dialogue::classify(last_agent.as_deref(), &persona.welcome_message);
                dialogue::next_reply(state).to_string()
            }
            ChatMode::Default => dialogue::default_mode_reply(persona),
        }
    }

    async fn last_agent_text(&self) -> Option<String> {
        self.shared
            .messages
            .read()
            .await
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Agent)
            .map(|m| m.text.clone())
    }

    /// The current history, ordered by `created_at` ascending.
    pub async fn messages(&self) -> Vec<Message> {
        self.shared.messages.read().await.clone()
    }

    /// Subscribes to the typing indicator.
    pub fn typing(&self) -> watch::Receiver<bool> {
        self.timing.typing()
    }

    /// Subscribes to the cosmetic online/offline badge.
    pub fn online(&self) -> watch::Receiver<bool> {
        self.presence.online()
    }

    /// The persona fronting the conversation right now.
    pub async fn active_persona(&self) -> Persona {
        let mode = *self.shared.mode.read().await;
        self.scheduler.select_active(mode).await
    }

    /// The current session identity.
    pub async fn session(&self) -> Session {
        Session::new(
            *self.shared.session_id.read().await,
            *self.shared.mode.read().await,
        )
    }

    /// Contextual quick-reply suggestions for the user's next turn.
    pub async fn quick_replies(&self) -> &'static [&'static str] {
        let mode = *self.shared.mode.read().await;
        if mode != ChatMode::Qualification {
            return &[];
        }
        let persona = self.scheduler.select_active(mode).await;
        let last_agent = self.last_agent_text().await;
        dialogue::quick_replies(dialogue::classify(
            last_agent.as_deref(),
            &persona.welcome_message,
        ))
    }

    /// Clears the conversation and reseeds the welcome message.
    ///
    /// Pending reply timers are cancelled first, so no orphaned reply can
    /// land in the fresh history. The session keeps its identity.
    pub async fn reset(&self) {
        self.timing.cancel_pending();
        let mode = *self.shared.mode.read().await;
        let session_id = *self.shared.session_id.read().await;
        self.shared.store.reset(mode, session_id).await;
        self.shared.messages.write().await.clear();
        self.reload_history().await;
    }

    /// Switches the conversation to another mode.
    ///
    /// Cancels pending reply timers, swaps in the other mode's session
    /// identity, and reloads (or seeds) that mode's history.
    pub async fn set_mode(&self, mode: ChatMode) -> Result<()> {
        if *self.shared.mode.read().await == mode {
            return Ok(());
        }
        self.timing.cancel_pending();
        let session_id = self.shared.store.get_or_create_session_id(mode).await?;
        *self.shared.mode.write().await = mode;
        *self.shared.session_id.write().await = session_id;
        self.shared.messages.write().await.clear();
        self.reload_history().await;
        Ok(())
    }

    /// Tears the conversation down: cancels reply timers and freezes the
    /// presence badge. In-flight remote writes are left to finish.
    pub fn shutdown(&self) {
        self.timing.cancel_pending();
        self.presence.stop();
    }

    async fn reload_history(&self) {
        let mode = *self.shared.mode.read().await;
        let session_id = *self.shared.session_id.read().await;
        let mut history = self.shared.store.load_history(mode, session_id).await;
        if history.is_empty() {
            let persona = self.scheduler.select_active(mode).await;
            let welcome = Message::agent(session_id, persona.welcome_message.clone());
            if let Err(e) = self.shared.store.append(mode, &welcome).await {
                warn!(error = %e, "failed to persist welcome message");
            }
            history.push(welcome);
        }
        *self.shared.messages.write().await = history;
    }
}
