//! Chat assistant orchestrator.
//!
//! Runs one conversation turn: validate the message, capture the state
//! snapshot, record the user message, wait the typing delay, then generate
//! and record the answer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use ecowatt_core::{AppStateStore, EcoWattConfig, Scheduler};
use tracing::{debug, info};

use crate::context::ChatContextSnapshot;
use crate::conversation::{ConversationLog, ConversationMessage};
use crate::error::ChatError;
use crate::response::ResponseEngine;

/// Conversation front end over a [`ResponseEngine`].
pub struct ChatAssistant {
    engine: ResponseEngine,
    log: Mutex<ConversationLog>,
    scheduler: Arc<dyn Scheduler>,
    typing_delay: Duration,
    max_message_length: usize,
}

impl ChatAssistant {
    /// Assistant whose history opens with the greeting.
    pub fn new(config: &EcoWattConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            engine: ResponseEngine::from_config(config),
            log: Mutex::new(ConversationLog::with_greeting(Utc::now())),
            scheduler,
            typing_delay: config.chat.typing_delay(),
            max_message_length: config.chat.max_message_length,
        }
    }

    fn lock_log(&self) -> Result<MutexGuard<'_, ConversationLog>, ChatError> {
        self.log
            .lock()
            .map_err(|e| ChatError::State(format!("Lock poisoned: {}", e)))
    }

    /// Send a user message and return the assistant's reply.
    ///
    /// The reply is computed from the state as it was when the message was
    /// sent, even if the store changes during the typing delay.
    pub async fn send(
        &self,
        text: &str,
        store: &AppStateStore,
    ) -> Result<ConversationMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidInput("message is empty".to_string()));
        }
        let length = text.chars().count();
        if length > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        let snapshot = ChatContextSnapshot::capture(store)?;
        {
            let mut log = self.lock_log()?;
            let ts = log.next_timestamp(Utc::now());
            log.append(ConversationMessage::from_user(text, ts))?;
        }
        debug!(chars = length, "User message recorded");

        self.scheduler.sleep(self.typing_delay).await;

        let response = self.engine.generate_response(text, &snapshot)?;
        let mut log = self.lock_log()?;
        let ts = log.next_timestamp(Utc::now());
        let reply = ConversationMessage::from_assistant(response.text, response.suggestions, ts);
        log.append(reply.clone())?;

        info!(intent = ?response.intent, history = log.len(), "Assistant replied");
        Ok(reply)
    }

    /// Copy of the conversation so far, oldest first.
    pub fn history(&self) -> Result<Vec<ConversationMessage>, ChatError> {
        Ok(self.lock_log()?.messages().to_vec())
    }
}
