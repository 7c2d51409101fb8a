//! Energy assistant chat for EcoWatt.
//!
//! Keyword intent classification, canned French answers filled from a
//! snapshot of the application state, and an append-only conversation log.

pub mod context;
pub mod conversation;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod response;

pub use context::ChatContextSnapshot;
pub use conversation::{ConversationLog, ConversationMessage};
pub use error::ChatError;
pub use orchestrator::ChatAssistant;
pub use parser::{classify_intent, normalize, ChatIntent};
pub use response::{EngineResponse, ResponseEngine};
