//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a `&Connection`, plus the `RecordStore` trait the
//! HTTP layer depends on instead of a concrete database.

mod diagnostic_test;

use uuid::Uuid;

use super::DatabaseError;
use crate::models::{DiagnosticTest, DiagnosticTestPayload};

pub use diagnostic_test::*;

/// Storage collaborator for diagnostic tests.
///
/// Implementations assign ids on `create` and report an unknown id on
/// `update`/`delete` as `DatabaseError::NotFound`.
pub trait RecordStore: Send + Sync {
    fn list(&self) -> Result<Vec<DiagnosticTest>, DatabaseError>;
    fn create(&self, payload: &DiagnosticTestPayload) -> Result<DiagnosticTest, DatabaseError>;
    fn find_by_id(&self, id: &Uuid) -> Result<Option<DiagnosticTest>, DatabaseError>;
    fn update(
        &self,
        id: &Uuid,
        payload: &DiagnosticTestPayload,
    ) -> Result<DiagnosticTest, DatabaseError>;
    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError>;
}
