//! Shared types for the API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::db::RecordStore;
use crate::models::DiagnosticTest;

/// Shared context for all API routes.
///
/// Holds the injected storage handle; the hosting process decides which
/// store backs it and when it is opened or dropped.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn RecordStore>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

/// `GET /api/records` response body.
#[derive(Debug, Serialize)]
pub struct RecordList {
    pub records: Vec<DiagnosticTest>,
}
