//! Transport-agnostic handler for the JSON toggle endpoint.
//!
//! Maps request bodies to [`TransitionEngine`] calls and outcomes to an HTTP
//! status plus [`ToggleResponse`] body. The hosting server only has to copy
//! both onto the wire.

use http::StatusCode;
use tool_custody_api::{
    CustodyError, FieldErrors, ToggleRequest, ToggleResponse, STORAGE_FAILURE_MESSAGE,
};
use tool_custody_db::repository::CommitUnitOfWork;
use tracing::debug;

use crate::transition::{ToggleCommand, TransitionEngine};

const INVALID_JSON_MESSAGE: &str = "Invalid JSON body.";

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleReply {
    pub status: StatusCode,
    pub body: ToggleResponse,
}

impl ToggleReply {
    fn new(status: StatusCode, body: ToggleResponse) -> Self {
        Self { status, body }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.body)
    }
}

impl From<CustodyError> for ToggleReply {
    fn from(err: CustodyError) -> Self {
        match err {
            CustodyError::Validation { message, errors } => {
                ToggleReply::new(StatusCode::BAD_REQUEST, ToggleResponse::invalid(message, errors))
            }
            err @ (CustodyError::ActorNotFound { .. }
            | CustodyError::ToolNotFound { .. }
            | CustodyError::BadgeMismatch { .. }) => {
                ToggleReply::new(StatusCode::BAD_REQUEST, ToggleResponse::error(err.to_string()))
            }
            CustodyError::Storage { .. } | CustodyError::Aggregation { .. } => ToggleReply::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ToggleResponse::error(STORAGE_FAILURE_MESSAGE),
            ),
        }
    }
}

/// Handles a raw request body. An empty body counts as `{}`, so a bare POST
/// reports the missing fields.
pub async fn handle_toggle<U: CommitUnitOfWork>(
    engine: &TransitionEngine<U>,
    body: &[u8],
) -> ToggleReply {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ToggleRequest::default()
    } else {
        match serde_json::from_slice::<ToggleRequest>(body) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "rejected malformed toggle body");
                let mut errors = FieldErrors::new();
                errors.insert("body".to_string(), vec![e.to_string()]);
                return ToggleReply::new(
                    StatusCode::BAD_REQUEST,
                    ToggleResponse::invalid(INVALID_JSON_MESSAGE, errors),
                );
            }
        }
    };
    handle_toggle_request(engine, request).await
}

pub async fn handle_toggle_request<U: CommitUnitOfWork>(
    engine: &TransitionEngine<U>,
    request: ToggleRequest,
) -> ToggleReply {
    let outcome = match ToggleCommand::try_from(request) {
        Ok(command) => engine.toggle(command).await,
        Err(err) => Err(err),
    };
    match outcome {
        Ok(outcome) => ToggleReply::new(StatusCode::OK, outcome.response()),
        Err(err) => err.into(),
    }
}
