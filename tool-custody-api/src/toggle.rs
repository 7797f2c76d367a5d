//! Request and response shapes of the check-in/check-out toggle endpoint.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{CustodyError, FieldErrors};

pub const MAX_TOOL_ID_LEN: usize = 64;
pub const MAX_JOB_ID_LEN: usize = 64;
pub const CONDITION_CHOICES: [&str; 3] = ["Good", "Fair", "Damaged"];

/// Order in which field errors are reported; the first one becomes the message.
pub const TOGGLE_FIELDS: [&str; 6] = [
    "username",
    "badge_id",
    "tool_id_number",
    "job_id",
    "condition",
    "return_by",
];

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Badge + tool scan as submitted by a scan gun or mobile client.
///
/// Missing and `null` fields deserialize to empty strings so that every
/// problem surfaces as a validation message rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ToggleRequest {
    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "validate_required"))]
    pub username: String,

    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "validate_badge_id"))]
    pub badge_id: String,

    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "validate_tool_id"))]
    pub tool_id_number: String,

    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "validate_job_id"))]
    pub job_id: String,

    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "validate_condition"))]
    pub condition: String,

    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "validate_return_by"))]
    pub return_by: String,
}

impl ToggleRequest {
    pub fn new(username: &str, badge_id: &str, tool_id_number: &str) -> Self {
        Self {
            username: username.to_string(),
            badge_id: badge_id.to_string(),
            tool_id_number: tool_id_number.to_string(),
            ..Self::default()
        }
    }

    /// Runs every field rule and folds the failures into a single
    /// `CustodyError::Validation` whose message is the first violated rule.
    pub fn check(&self) -> Result<(), CustodyError> {
        self.validate().map_err(|errors| validation_failure(&errors))
    }

    /// Parsed `return_by` deadline; `None` when the field is blank or invalid.
    pub fn return_by_deadline(&self) -> Option<DateTime<Utc>> {
        parse_return_by(&self.return_by)
    }
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required", REQUIRED_MESSAGE));
    }
    Ok(())
}

fn validate_badge_id(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !value.trim().chars().all(char::is_alphanumeric) {
        return Err(rule("badge_id", "Badge ID must be alphanumeric."));
    }
    Ok(())
}

/// Tool IDs follow the industry format, e.g. `CONS-HAM-001`.
fn validate_tool_id(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > MAX_TOOL_ID_LEN {
        return Err(rule("tool_id_length", "Tool ID must be 1-64 characters."));
    }
    if !value.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(rule(
            "tool_id_charset",
            "Tool ID may only contain letters, numbers, and hyphens.",
        ));
    }
    Ok(())
}

fn validate_job_id(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() > MAX_JOB_ID_LEN {
        return Err(rule("job_id_length", "Job ID must be at most 64 characters."));
    }
    Ok(())
}

fn validate_condition(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || CONDITION_CHOICES.contains(&value) {
        return Ok(());
    }
    Err(rule("condition", "Not a valid choice."))
}

fn validate_return_by(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || parse_return_by(value).is_some() {
        return Ok(());
    }
    Err(rule("return_by", "Not a valid date."))
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD`, which means the end
/// of that day in UTC.
pub fn parse_return_by(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
    Some(day.and_time(end_of_day).and_utc())
}

/// Collapses `validator` output into the endpoint's error shape.
pub fn validation_failure(errors: &ValidationErrors) -> CustodyError {
    let by_field = errors.field_errors();
    let mut collected = FieldErrors::new();
    let mut first = None;

    for field in TOGGLE_FIELDS {
        let Some(field_errors) = by_field.get(field) else {
            continue;
        };
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        if first.is_none() {
            first = messages.first().cloned();
        }
        collected.insert(field.to_string(), messages);
    }

    CustodyError::Validation {
        message: first.unwrap_or_else(|| "Validation failed".to_string()),
        errors: collected,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Checkout,
    Checkin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ToggleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ToggleResponse {
    pub fn success(
        message: impl Into<String>,
        action: ToggleAction,
        calibration_warning: Option<String>,
    ) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            action: Some(action),
            calibration_warning,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            action: None,
            calibration_warning: None,
            errors: None,
        }
    }

    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::error(message)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
