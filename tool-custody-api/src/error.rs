use std::collections::BTreeMap;
use std::error::Error as StdError;

use thiserror::Error;

/// Field name to the messages of every rule it violated.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message shown to callers whenever the ledger itself fails.
pub const STORAGE_FAILURE_MESSAGE: &str = "A database error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum CustodyError {
    #[error("User '{username}' not found. Check the username.")]
    ActorNotFound { username: String },

    #[error("Tool '{tool_id}' not found. Check the tool ID.")]
    ToolNotFound { tool_id: String },

    #[error("Badge ID does not match user '{username}'. Please scan the correct badge.")]
    BadgeMismatch { username: String },

    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("A database error occurred. Please try again.")]
    Storage {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Aggregate query #{task} failed: {reason}")]
    Aggregation { task: usize, reason: String },
}

impl CustodyError {
    pub fn storage(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        CustodyError::Storage {
            source: source.into(),
        }
    }

    /// Builds a validation error for a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.clone()]);
        CustodyError::Validation { message, errors }
    }

    /// True for the outcomes whose message is shown to the requester verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CustodyError::ActorNotFound { .. }
                | CustodyError::ToolNotFound { .. }
                | CustodyError::BadgeMismatch { .. }
                | CustodyError::Validation { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CustodyError::ActorNotFound { .. } => "actor_not_found",
            CustodyError::ToolNotFound { .. } => "tool_not_found",
            CustodyError::BadgeMismatch { .. } => "badge_mismatch",
            CustodyError::Validation { .. } => "validation_error",
            CustodyError::Storage { .. } => "storage_error",
            CustodyError::Aggregation { .. } => "aggregation_error",
        }
    }
}

pub type CustodyResult<T> = Result<T, CustodyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_hides_detail_but_keeps_source() {
        let err = CustodyError::storage("connection reset by peer");
        assert_eq!(err.to_string(), STORAGE_FAILURE_MESSAGE);
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("connection reset by peer"));
        assert!(!err.is_user_facing());
    }

    #[test]
    fn domain_errors_render_user_messages() {
        let err = CustodyError::BadgeMismatch {
            username: "alice".to_string(),
        };
        assert!(err.to_string().contains("Badge ID does not match user 'alice'"));
        assert_eq!(err.kind(), "badge_mismatch");
        assert!(err.is_user_facing());
    }

    #[test]
    fn invalid_field_carries_its_message() {
        let err = CustodyError::invalid_field("return_by", "Not a valid date.");
        match err {
            CustodyError::Validation { message, errors } => {
                assert_eq!(message, "Not a valid date.");
                assert_eq!(errors["return_by"], vec!["Not a valid date.".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
