//! Model builders for tests across the workspace. Enabled by the
//! `test-utils` feature.

use heapless::String as HeaplessString;
use uuid::Uuid;

use crate::models::{ActorModel, ActorRole, ToolModel};

/// Copies `value` into a fixed-capacity string, dropping whatever does not fit.
pub fn heapless_truncated<const N: usize>(value: &str) -> HeaplessString<N> {
    let mut out = HeaplessString::new();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

pub fn create_test_actor(username: &str, badge_id: &str) -> ActorModel {
    ActorModel {
        id: Uuid::new_v4(),
        username: heapless_truncated(username),
        badge_id: heapless_truncated(badge_id),
        first_name: heapless_truncated("Test"),
        last_name: heapless_truncated(username),
        department: heapless_truncated("Maintenance"),
        role: ActorRole::User,
    }
}

/// An in-stock tool without calibration data.
pub fn create_test_tool(tool_id: &str, name: &str) -> ToolModel {
    ToolModel {
        id: Uuid::new_v4(),
        tool_id: heapless_truncated(tool_id),
        name: heapless_truncated(name),
        location: Some(heapless_truncated("Crib A")),
        category: None,
        status: Some(heapless_truncated("Available")),
        held_by: None,
        checkout_time: None,
        checkin_time: None,
        calibration_due: Some(heapless_truncated("N/A")),
        calibration_date: None,
        calibration_cert: None,
        calibration_schedule: None,
    }
}

pub fn create_calibrated_tool(tool_id: &str, name: &str, calibration_due: &str) -> ToolModel {
    ToolModel {
        calibration_due: Some(heapless_truncated(calibration_due)),
        calibration_schedule: Some(heapless_truncated("Annual")),
        ..create_test_tool(tool_id, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_capacity() {
        let short: HeaplessString<4> = heapless_truncated("wrench");
        assert_eq!(short.as_str(), "wren");
        let fits: HeaplessString<8> = heapless_truncated("wrench");
        assert_eq!(fits.as_str(), "wrench");
    }

    #[test]
    fn truncation_never_splits_a_character() {
        let cut: HeaplessString<5> = heapless_truncated("éééé");
        assert_eq!(cut.as_str(), "éé");
    }
}
