//! Diagnostic test record endpoints.
//!
//! - `GET /api/records`: every record
//! - `POST /api/records`: create
//! - `GET /api/records/:id`: one record
//! - `PUT /api/records/:id`: replace all fields but the id
//! - `DELETE /api/records/:id`: remove
//!
//! Identifier and body checks run before the store is touched; each
//! request then makes exactly one store call.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::api::error::{ApiError, Operation, MSG_ID_REQUIRED};
use crate::api::types::{ApiContext, RecordList};
use crate::models::{DiagnosticTest, DiagnosticTestPayload};
use crate::validation::validate_payload;

/// `GET /api/records`: all records, most recent test date first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<RecordList>, ApiError> {
    let records = ctx
        .store
        .list()
        .map_err(|e| ApiError::from_store(Operation::List, e))?;
    Ok(Json(RecordList { records }))
}

/// `POST /api/records`: validate and store a new record.
pub async fn create(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<DiagnosticTest>), ApiError> {
    let payload = parse_payload(&body)?;

    let record = ctx
        .store
        .create(&payload)
        .map_err(|e| ApiError::from_store(Operation::Create, e))?;

    tracing::info!(id = %record.id, "Diagnostic test created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/records/:id`: one record.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DiagnosticTest>, ApiError> {
    let id = parse_record_id(&id)?;

    ctx.store
        .find_by_id(&id)
        .map_err(|e| ApiError::from_store(Operation::Fetch, e))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// `PUT /api/records/:id`: validate and replace a record.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DiagnosticTest>, ApiError> {
    let id = parse_record_id(&id)?;
    let payload = parse_payload(&body)?;

    let record = ctx
        .store
        .update(&id, &payload)
        .map_err(|e| ApiError::from_store(Operation::Update, e))?;

    tracing::info!(id = %record.id, "Diagnostic test updated");
    Ok(Json(record))
}

/// `DELETE /api/records/:id`: 204 with an empty body.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_record_id(&id)?;

    ctx.store
        .delete(&id)
        .map_err(|e| ApiError::from_store(Operation::Delete, e))?;

    tracing::info!(%id, "Diagnostic test deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// A blank id is a bad request. Anything that is not a UUID cannot name a
/// stored record, so it is answered as not found without asking the store.
fn parse_record_id(raw: &str) -> Result<Uuid, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::BadRequest(MSG_ID_REQUIRED.into()));
    }
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn parse_payload(body: &[u8]) -> Result<DiagnosticTestPayload, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Request body must be valid JSON".into()))?;

    validate_payload(&value).map_err(|err| {
        tracing::debug!(field = err.field(), %err, "Rejected diagnostic test payload");
        ApiError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_id_is_bad_request() {
        assert!(matches!(parse_record_id(""), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_record_id("  "), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn non_uuid_id_is_not_found() {
        assert!(matches!(parse_record_id("42"), Err(ApiError::NotFound)));
    }

    #[test]
    fn uuid_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_record_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn malformed_json_is_bad_request() {
        assert!(matches!(parse_payload(b"{not json"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_payload(b""), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn invalid_payload_is_validation_error() {
        let result = parse_payload(br#"{"patientName":""}"#);
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
