//! Conversation session: owns the ordered transcript and drives the
//! LLM transport one turn at a time.
//!
//! Callers must serialize turns per session; `send_turn` takes `&mut self`
//! so the borrow checker enforces one in-flight turn at a time.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use vesper_core::sysinfo::machine_info;
use vesper_core::types::Turn;
use vesper_llm::LlmTransport;

use crate::error::SessionError;
use crate::history::HistoryStore;

/// A conversation with the model, persisted through a [`HistoryStore`].
pub struct ConversationSession {
    id: Uuid,
    transport: Box<dyn LlmTransport>,
    store: HistoryStore,
    history: Vec<Turn>,
    started_at: DateTime<Utc>,
    last_turn_at: Option<DateTime<Utc>>,
}

impl ConversationSession {
    /// Create a new, unprimed session.
    pub fn new(transport: Box<dyn LlmTransport>, store: HistoryStore) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            store,
            history: Vec::new(),
            started_at: Utc::now(),
            last_turn_at: None,
        }
    }

    /// Session identifier used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session object was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the most recent turn completed, if any.
    pub fn last_turn_at(&self) -> Option<DateTime<Utc>> {
        self.last_turn_at
    }

    /// The ordered transcript as it stands.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Reset the transcript and seed it.
    ///
    /// If a prior history file exists it is loaded (best-effort per record);
    /// otherwise the transcript starts with one synthetic model turn holding
    /// the primer template plus a machine-information block.
    pub fn prime(&mut self, primer: &str) -> Result<(), SessionError> {
        self.history.clear();
        match self.store.load()? {
            Some(turns) => {
                info!(session = %self.id, turns = turns.len(), "History loaded from disk");
                self.history = turns;
            }
            None => {
                let seeded = format!("{}\n\nSystem Information:\n{}", primer, machine_info());
                self.history.push(Turn::model(seeded));
                info!(session = %self.id, "No prior history; session seeded from primer");
            }
        }
        Ok(())
    }

    /// Send one turn to the model and return the raw reply text.
    ///
    /// The user turn is appended before the transport call, so on a failed
    /// send it stays in memory but is never persisted (the store only saves
    /// after a successful reply). The first content part of the first
    /// candidate is authoritative; anything less is [`SessionError::NoContent`].
    pub async fn send_turn(&mut self, text: &str) -> Result<String, SessionError> {
        self.history.push(Turn::user(text));

        let reply = self.transport.generate(&self.history).await?;
        let reply_text = reply
            .first_text()
            .ok_or(SessionError::NoContent)?
            .to_string();

        self.history.push(Turn::model(reply_text.clone()));
        self.last_turn_at = Some(Utc::now());

        // Persistence is coupled to transport success, not to dispatch.
        if let Err(e) = self.store.save(&self.history) {
            warn!(session = %self.id, error = %e, "Failed to save history");
        }

        debug!(
            session = %self.id,
            turns = self.history.len(),
            reply_len = reply_text.len(),
            "Turn completed"
        );
        Ok(reply_text)
    }

    /// Persist the current transcript, logging on failure.
    pub fn save(&self) {
        if let Err(e) = self.store.save(&self.history) {
            warn!(session = %self.id, error = %e, "Failed to save history");
        }
    }
}
