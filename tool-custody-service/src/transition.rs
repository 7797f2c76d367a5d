//! Check-in/check-out toggling.
//!
//! A toggle reads the actor and tool inside one unit of work, flips custody,
//! appends a ledger event and commits both writes together. Any failure rolls
//! the unit of work back.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use tool_custody_api::{
    CustodyError, CustodyResult, ToggleRequest, ToggleResponse, MAX_JOB_ID_LEN,
};
use tool_custody_db::models::{CheckoutAction, CheckoutEventModel, ToolCondition, ToolModel};
use tool_custody_db::repository::{CommitUnitOfWork, CustodySession};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calibration;
use crate::storage_failure;

const CALIBRATION_SUFFIX: &str = " ⚠ Calibration overdue.";

/// A validated, normalized toggle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleCommand {
    pub username: String,
    pub badge_id: String,
    pub tool_id: String,
    pub job_reference: Option<HeaplessString<64>>,
    pub condition: Option<ToolCondition>,
    pub return_by: Option<DateTime<Utc>>,
}

impl ToggleCommand {
    pub fn new(username: &str, badge_id: &str, tool_id: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            badge_id: badge_id.trim().to_string(),
            tool_id: tool_id.trim().to_string(),
            job_reference: None,
            condition: None,
            return_by: None,
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl TryFrom<ToggleRequest> for ToggleCommand {
    type Error = CustodyError;

    fn try_from(request: ToggleRequest) -> Result<Self, Self::Error> {
        request.check()?;

        let job_reference = non_empty(&request.job_id)
            .map(|job| {
                HeaplessString::<64>::from_str(job).map_err(|_| {
                    CustodyError::invalid_field(
                        "job_id",
                        format!("Job ID must be at most {MAX_JOB_ID_LEN} characters."),
                    )
                })
            })
            .transpose()?;

        let condition = non_empty(&request.condition)
            .map(|condition| {
                ToolCondition::from_str(condition)
                    .map_err(|_| CustodyError::invalid_field("condition", "Not a valid choice."))
            })
            .transpose()?;

        Ok(Self {
            job_reference,
            condition,
            return_by: request.return_by_deadline(),
            ..Self::new(&request.username, &request.badge_id, &request.tool_id_number)
        })
    }
}

/// Non-fatal findings attached to a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustodyWarning {
    CalibrationOverdue,
}

impl CustodyWarning {
    pub fn message(&self) -> &'static str {
        match self {
            CustodyWarning::CalibrationOverdue => "This tool is overdue for calibration.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub action: CheckoutAction,
    pub message: String,
    pub warnings: Vec<CustodyWarning>,
    /// Tool as committed.
    pub tool: ToolModel,
    pub event: CheckoutEventModel,
    /// Previous holder when the checkout took the tool from someone else.
    pub transferred_from: Option<String>,
}

impl ToggleOutcome {
    pub fn response(&self) -> ToggleResponse {
        ToggleResponse::success(
            self.message.clone(),
            self.action.into(),
            self.warnings.first().map(|w| w.message().to_string()),
        )
    }
}

pub struct TransitionEngine<U: CommitUnitOfWork> {
    store: Arc<U>,
}

impl<U: CommitUnitOfWork> Clone for TransitionEngine<U> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<U: CommitUnitOfWork> TransitionEngine<U> {
    pub fn new(store: Arc<U>) -> Self {
        Self { store }
    }

    pub async fn toggle(&self, command: ToggleCommand) -> CustodyResult<ToggleOutcome> {
        self.toggle_at(command, Utc::now()).await
    }

    /// Toggles custody with `now` as the event time and the reference point
    /// for the calibration check.
    pub async fn toggle_at(
        &self,
        command: ToggleCommand,
        now: DateTime<Utc>,
    ) -> CustodyResult<ToggleOutcome> {
        let session = self
            .store
            .begin_unit_of_work()
            .await
            .map_err(storage_failure)?;

        let outcome = match apply(&session, &command, now).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(rollback_err) = session.rollback_unit_of_work().await {
                    warn!(error = %rollback_err, "rollback after failed toggle did not complete");
                }
                if err.is_user_facing() {
                    warn!(
                        kind = err.kind(),
                        username = %command.username,
                        tool_id = %command.tool_id,
                        "toggle rejected"
                    );
                }
                return Err(err);
            }
        };

        // A failed commit discards the staged writes.
        session.commit_unit_of_work().await.map_err(storage_failure)?;

        info!(
            action = %outcome.action,
            username = %command.username,
            tool_id = %command.tool_id,
            event_id = %outcome.event.id,
            "custody transition committed"
        );
        Ok(outcome)
    }
}

async fn apply<S: CustodySession>(
    session: &S,
    command: &ToggleCommand,
    now: DateTime<Utc>,
) -> CustodyResult<ToggleOutcome> {
    let actor = session
        .find_actor_by_username(&command.username)
        .await
        .map_err(storage_failure)?
        .ok_or_else(|| CustodyError::ActorNotFound {
            username: command.username.clone(),
        })?;

    let mut tool = session
        .find_tool_by_id(&command.tool_id)
        .await
        .map_err(storage_failure)?
        .ok_or_else(|| CustodyError::ToolNotFound {
            tool_id: command.tool_id.clone(),
        })?;

    if !actor.badge_matches(&command.badge_id) {
        return Err(CustodyError::BadgeMismatch {
            username: command.username.clone(),
        });
    }

    // Scanning a tool held by someone else checks it out to the scanner.
    let (action, transferred_from) = if tool.is_held_by(actor.username.as_str()) {
        tool.held_by = None;
        tool.checkin_time = Some(now);
        (CheckoutAction::Checkin, None)
    } else {
        let previous = tool.held_by.replace(actor.username.clone());
        tool.checkout_time = Some(now);
        (CheckoutAction::Checkout, previous.map(|p| p.to_string()))
    };

    if let Some(previous) = &transferred_from {
        warn!(
            tool_id = %tool.tool_id,
            from = %previous,
            to = %actor.username,
            "custody transferred without check-in"
        );
    }

    let event = CheckoutEventModel {
        id: Uuid::new_v4(),
        tool_id: tool.tool_id.clone(),
        tool_name: Some(tool.name.clone()),
        actor: actor.username.clone(),
        action,
        event_time: now,
        job_reference: command.job_reference.clone(),
        condition: command.condition,
        return_by: match action {
            CheckoutAction::Checkout => command.return_by,
            CheckoutAction::Checkin => None,
        },
    };

    session
        .update_tool_custody(&tool)
        .await
        .map_err(storage_failure)?;
    let event = session.append_event(&event).await.map_err(storage_failure)?;

    let mut warnings = Vec::new();
    let mut message = match action {
        CheckoutAction::Checkin => format!("Tool {} checked in.", tool.name),
        CheckoutAction::Checkout => format!("Tool {} checked out.", tool.name),
    };
    if action == CheckoutAction::Checkout
        && calibration::is_overdue(tool.calibration_due_str(), now.date_naive())
    {
        warnings.push(CustodyWarning::CalibrationOverdue);
        message.push_str(CALIBRATION_SUFFIX);
    }

    Ok(ToggleOutcome {
        action,
        message,
        warnings,
        tool,
        event,
        transferred_from,
    })
}
