//! SQLite-backed `RecordStore`.
//!
//! Owns one connection behind a mutex; each trait call locks it for the
//! duration of a single statement, so concurrent writers are serialized
//! by SQLite's own transaction rules.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use super::repository::{
    delete_diagnostic_test, get_all_diagnostic_tests, get_diagnostic_test,
    insert_diagnostic_test, update_diagnostic_test, RecordStore,
};
use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;
use crate::models::{DiagnosticTest, DiagnosticTestPayload};

pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    /// Wrap an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl RecordStore for SqliteRecordStore {
    fn list(&self) -> Result<Vec<DiagnosticTest>, DatabaseError> {
        let conn = self.conn()?;
        get_all_diagnostic_tests(&conn)
    }

    fn create(&self, payload: &DiagnosticTestPayload) -> Result<DiagnosticTest, DatabaseError> {
        let test = DiagnosticTest::from_payload(Uuid::new_v4(), payload.clone());
        let conn = self.conn()?;
        insert_diagnostic_test(&conn, &test)?;
        Ok(test)
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<DiagnosticTest>, DatabaseError> {
        let conn = self.conn()?;
        get_diagnostic_test(&conn, id)
    }

    fn update(
        &self,
        id: &Uuid,
        payload: &DiagnosticTestPayload,
    ) -> Result<DiagnosticTest, DatabaseError> {
        let test = DiagnosticTest::from_payload(*id, payload.clone());
        let conn = self.conn()?;
        update_diagnostic_test(&conn, &test)?;
        Ok(test)
    }

    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError> {
        let conn = self.conn()?;
        delete_diagnostic_test(&conn, id)
    }
}
