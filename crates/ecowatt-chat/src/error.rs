//! Error types for the chat assistant.

use chrono::{DateTime, Utc};
use ecowatt_core::error::EcoWattError;

/// Errors from the response engine and the chat assistant.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("message timestamp {attempted} is not after {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },
    #[error("state error: {0}")]
    State(String),
}

impl From<EcoWattError> for ChatError {
    fn from(err: EcoWattError) -> Self {
        ChatError::State(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::InvalidInput("utterance is empty".to_string());
        assert_eq!(err.to_string(), "invalid input: utterance is empty");

        let err = ChatError::MessageTooLong(2000);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 2000 characters"
        );

        let err = ChatError::State("lock poisoned".to_string());
        assert_eq!(err.to_string(), "state error: lock poisoned");
    }

    #[test]
    fn test_out_of_order_display() {
        let last = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let attempted = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let err = ChatError::OutOfOrder { last, attempted };
        let msg = err.to_string();
        assert!(msg.contains("2024-01-01 09:00:00 UTC"));
        assert!(msg.contains("2024-01-01 10:00:00 UTC"));
    }

    #[test]
    fn test_chat_error_from_core_error() {
        let core_err = EcoWattError::State("poisoned".to_string());
        let chat_err: ChatError = core_err.into();
        assert!(matches!(chat_err, ChatError::State(_)));
        assert!(chat_err.to_string().contains("poisoned"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::MessageTooLong(1));
        assert!(dbg.contains("MessageTooLong"));
        let dbg = format!("{:?}", ChatError::InvalidInput(String::new()));
        assert!(dbg.contains("InvalidInput"));
    }
}
