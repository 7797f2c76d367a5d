use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tool_custody_api::{EventSummary, ToggleAction};
use uuid::Uuid;

/// Database model for checkout action enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "checkout_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CheckoutAction {
    Checkout,
    Checkin,
}

impl std::fmt::Display for CheckoutAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutAction::Checkout => write!(f, "checkout"),
            CheckoutAction::Checkin => write!(f, "checkin"),
        }
    }
}

impl FromStr for CheckoutAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkout" => Ok(CheckoutAction::Checkout),
            "checkin" => Ok(CheckoutAction::Checkin),
            _ => Err(()),
        }
    }
}

impl From<CheckoutAction> for ToggleAction {
    fn from(action: CheckoutAction) -> Self {
        match action {
            CheckoutAction::Checkout => ToggleAction::Checkout,
            CheckoutAction::Checkin => ToggleAction::Checkin,
        }
    }
}

/// Database model for tool condition enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tool_condition", rename_all = "PascalCase")]
pub enum ToolCondition {
    Good,
    Fair,
    Damaged,
}

impl std::fmt::Display for ToolCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolCondition::Good => write!(f, "Good"),
            ToolCondition::Fair => write!(f, "Fair"),
            ToolCondition::Damaged => write!(f, "Damaged"),
        }
    }
}

impl FromStr for ToolCondition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Good" => Ok(ToolCondition::Good),
            "Fair" => Ok(ToolCondition::Fair),
            "Damaged" => Ok(ToolCondition::Damaged),
            _ => Err(()),
        }
    }
}

/// Database model for CheckoutEvent
/// One immutable ledger entry per custody transition. Rows are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutEventModel {
    pub id: Uuid,

    /// References ToolModel.tool_id
    pub tool_id: HeaplessString<64>,

    /// Tool name at the time of the event
    pub tool_name: Option<HeaplessString<64>>,

    /// References ActorModel.username
    pub actor: HeaplessString<128>,

    pub action: CheckoutAction,
    pub event_time: DateTime<Utc>,
    pub job_reference: Option<HeaplessString<64>>,
    pub condition: Option<ToolCondition>,

    /// Return deadline; only ever set on checkouts
    pub return_by: Option<DateTime<Utc>>,
}

impl CheckoutEventModel {
    pub fn is_checkout(&self) -> bool {
        self.action == CheckoutAction::Checkout
    }
}

impl From<&CheckoutEventModel> for EventSummary {
    fn from(event: &CheckoutEventModel) -> Self {
        EventSummary {
            event_time: event.event_time,
            action: event.action.into(),
            tool_id_number: event.tool_id.to_string(),
            tool_name: event
                .tool_name
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            username: event.actor.to_string(),
            job_id: event.job_reference.as_ref().map(|s| s.to_string()),
            condition: event.condition.map(|c| c.to_string()),
            return_by: event.return_by,
        }
    }
}
