//! Input validation and normalization for diagnostic test payloads.
//!
//! Takes the decoded request body as an untyped JSON value and either
//! returns a typed `DiagnosticTestPayload` or the first rule it breaks.
//! Rules run in a fixed order:
//! 1. `patientName` 2. `testType` 3. `result` 4. `testDate` 5. `notes`
//!
//! Pure: no I/O, no logging.

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::{Map, Value};

use crate::models::DiagnosticTestPayload;

pub const FIELD_PATIENT_NAME: &str = "patientName";
pub const FIELD_TEST_TYPE: &str = "testType";
pub const FIELD_RESULT: &str = "result";
pub const FIELD_TEST_DATE: &str = "testDate";
pub const FIELD_NOTES: &str = "notes";

/// The first rule a payload broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a string")]
    NotText { field: &'static str },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("testDate must be an ISO-8601 date-time, e.g. 2024-01-01T10:00")]
    InvalidTestDate,
}

impl ValidationError {
    /// Wire name of the offending field, if the failure concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject => None,
            Self::Missing { field } | Self::NotText { field } | Self::Empty { field } => {
                Some(*field)
            }
            Self::InvalidTestDate => Some(FIELD_TEST_DATE),
        }
    }
}

/// Validate a raw request body and normalize it for storage.
///
/// Text fields are kept exactly as submitted; only the emptiness check
/// ignores surrounding whitespace. Running this again on the JSON form of
/// its own output yields the same payload.
pub fn validate_payload(body: &Value) -> Result<DiagnosticTestPayload, ValidationError> {
    let fields = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let patient_name = required_text(fields, FIELD_PATIENT_NAME)?;
    let test_type = required_text(fields, FIELD_TEST_TYPE)?;
    let result = required_text(fields, FIELD_RESULT)?;
    let test_date = match fields.get(FIELD_TEST_DATE) {
        None | Some(Value::Null) => {
            return Err(ValidationError::Missing {
                field: FIELD_TEST_DATE,
            })
        }
        Some(Value::String(raw)) => normalize_test_date(raw)?,
        Some(_) => {
            return Err(ValidationError::NotText {
                field: FIELD_TEST_DATE,
            })
        }
    };
    let notes = optional_text(fields, FIELD_NOTES)?;

    Ok(DiagnosticTestPayload {
        patient_name,
        test_type,
        result,
        test_date,
        notes,
    })
}

/// Parse a submitted test date into a UTC instant with whole seconds.
///
/// Accepts any RFC 3339 instant, plus a browser `datetime-local` value
/// (`YYYY-MM-DDTHH:MM`). A clock without seconds gets `:00`; a value with
/// no zone designator is read as UTC.
pub fn normalize_test_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let (date, time) = raw
        .trim()
        .split_once(|c: char| c.eq_ignore_ascii_case(&'T'))
        .ok_or(ValidationError::InvalidTestDate)?;

    let (clock, zone) = split_zone(time);
    let seconds = if clock.matches(':').count() == 1 { ":00" } else { "" };
    let zone = if zone.is_empty() || zone.eq_ignore_ascii_case("z") {
        "Z"
    } else {
        zone
    };

    DateTime::parse_from_rfc3339(&format!("{date}T{clock}{seconds}{zone}"))
        .map(|parsed| parsed.with_timezone(&Utc).trunc_subsecs(0))
        .map_err(|_| ValidationError::InvalidTestDate)
}

/// Split a time of day into its clock and trailing zone designator
/// (`Z`, `z`, `+HH:MM` or `-HH:MM`); the zone is empty when absent.
fn split_zone(time: &str) -> (&str, &str) {
    if time.ends_with(|c: char| c.eq_ignore_ascii_case(&'Z')) {
        return time.split_at(time.len() - 1);
    }
    match time.rfind(|c: char| c == '+' || c == '-') {
        Some(at) => time.split_at(at),
        None => (time, ""),
    }
}

fn required_text(fields: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing { field }),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(ValidationError::Empty { field })
        }
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ValidationError::NotText { field }),
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::NotText { field }),
    }
}
