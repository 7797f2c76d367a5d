use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use tool_custody_api::ToolSummary;
use uuid::Uuid;

/// Database model for Tool
/// A physical tool kept in the crib, identified by its business `tool_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolModel {
    pub id: Uuid,

    /// Business key, e.g. `CONS-HAM-001`
    pub tool_id: HeaplessString<64>,
    pub name: HeaplessString<64>,
    pub location: Option<HeaplessString<64>>,
    pub category: Option<HeaplessString<64>>,

    /// Free-form status label maintained by the crib staff
    pub status: Option<HeaplessString<32>>,

    /// References ActorModel.username; `None` while the tool is in stock
    pub held_by: Option<HeaplessString<128>>,

    pub checkout_time: Option<DateTime<Utc>>,
    pub checkin_time: Option<DateTime<Utc>>,

    /// Date strings in one of several formats, or the sentinel "N/A"
    pub calibration_due: Option<HeaplessString<32>>,
    pub calibration_date: Option<HeaplessString<32>>,
    pub calibration_cert: Option<HeaplessString<64>>,
    pub calibration_schedule: Option<HeaplessString<32>>,
}

impl ToolModel {
    pub fn is_checked_out(&self) -> bool {
        self.held_by.is_some()
    }

    pub fn is_held_by(&self, username: &str) -> bool {
        self.held_by
            .as_ref()
            .is_some_and(|holder| holder.as_str() == username)
    }

    pub fn calibration_due_str(&self) -> &str {
        self.calibration_due.as_ref().map(|s| s.as_str()).unwrap_or("")
    }
}

impl From<&ToolModel> for ToolSummary {
    fn from(tool: &ToolModel) -> Self {
        ToolSummary {
            tool_id_number: tool.tool_id.to_string(),
            tool_name: tool.name.to_string(),
            tool_location: tool.location.as_ref().map(|s| s.to_string()),
            tool_status: tool.status.as_ref().map(|s| s.to_string()),
            checked_out_by: tool.held_by.as_ref().map(|s| s.to_string()),
            tool_calibration_due: tool.calibration_due.as_ref().map(|s| s.to_string()),
        }
    }
}
