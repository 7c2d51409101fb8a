//! Append-only conversation history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;

const GREETING: &str = "Bonjour ! 👋 Je suis votre assistant énergétique personnel. Comment puis-je vous aider à optimiser votre consommation électrique aujourd'hui ?";

const GREETING_SUGGESTIONS: [&str; 3] = [
    "Pourquoi ma facture est-elle élevée ?",
    "Comment réduire ma consommation ?",
    "Quels appareils consomment le plus ?",
];

/// One entry in the conversation, from the user or from the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub text: String,
    pub is_from_user: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ConversationMessage {
    pub fn from_user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_from_user: true,
            timestamp,
            suggestions: None,
        }
    }

    /// Assistant message. An empty suggestion list is stored as `None`.
    pub fn from_assistant(
        text: impl Into<String>,
        suggestions: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_from_user: false,
            timestamp,
            suggestions: (!suggestions.is_empty()).then_some(suggestions),
        }
    }
}

/// Messages in strictly increasing timestamp order. Entries are never edited
/// or removed.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<ConversationMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log opened by the assistant's greeting.
    pub fn with_greeting(now: DateTime<Utc>) -> Self {
        let greeting = ConversationMessage::from_assistant(
            GREETING,
            GREETING_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            now,
        );
        Self {
            messages: vec![greeting],
        }
    }

    /// Add a message. Its timestamp must be later than the last one, and a
    /// suggestion list, when present, must not be empty.
    pub fn append(&mut self, message: ConversationMessage) -> Result<(), ChatError> {
        if message.suggestions.as_ref().is_some_and(|s| s.is_empty()) {
            return Err(ChatError::InvalidInput(
                "suggestion list is present but empty".to_string(),
            ));
        }
        if let Some(last) = self.messages.last() {
            if message.timestamp <= last.timestamp {
                return Err(ChatError::OutOfOrder {
                    last: last.timestamp,
                    attempted: message.timestamp,
                });
            }
        }
        self.messages.push(message);
        Ok(())
    }

    /// Earliest timestamp at or after `now` that `append` will accept.
    pub fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.messages.last() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::milliseconds(1),
            _ => now,
        }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
