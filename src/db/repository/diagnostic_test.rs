use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{format_test_date, DiagnosticTest};

const ENTITY_TYPE: &str = "diagnostic_test";

pub fn insert_diagnostic_test(conn: &Connection, test: &DiagnosticTest) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO diagnostic_tests (id, patient_name, test_type, result, test_date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            test.id.to_string(),
            test.patient_name,
            test.test_type,
            test.result,
            format_test_date(&test.test_date),
            test.notes,
        ],
    )?;
    Ok(())
}

pub fn get_diagnostic_test(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<DiagnosticTest>, DatabaseError> {
    let test = conn
        .query_row(
            "SELECT id, patient_name, test_type, result, test_date, notes
             FROM diagnostic_tests WHERE id = ?1",
            params![id.to_string()],
            row_to_diagnostic_test,
        )
        .optional()?;
    Ok(test)
}

/// Every stored test, most recent test date first.
///
/// Ties keep insertion order.
pub fn get_all_diagnostic_tests(conn: &Connection) -> Result<Vec<DiagnosticTest>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, test_type, result, test_date, notes
         FROM diagnostic_tests ORDER BY test_date DESC, rowid ASC",
    )?;
    let rows = stmt.query_map([], row_to_diagnostic_test)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Replace every field but the id. Fails with `NotFound` if the id is unknown.
pub fn update_diagnostic_test(conn: &Connection, test: &DiagnosticTest) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE diagnostic_tests
         SET patient_name = ?2, test_type = ?3, result = ?4, test_date = ?5, notes = ?6
         WHERE id = ?1",
        params![
            test.id.to_string(),
            test.patient_name,
            test.test_type,
            test.result,
            format_test_date(&test.test_date),
            test.notes,
        ],
    )?;
    if affected == 0 {
        return Err(not_found(&test.id));
    }
    Ok(())
}

/// Delete a test by ID.
pub fn delete_diagnostic_test(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM diagnostic_tests WHERE id = ?1",
        params![id.to_string()],
    )?;
    if affected == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

fn not_found(id: &Uuid) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: ENTITY_TYPE.into(),
        id: id.to_string(),
    }
}

fn row_to_diagnostic_test(row: &rusqlite::Row) -> Result<DiagnosticTest, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let date_str: String = row.get(4)?;

    Ok(DiagnosticTest {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        patient_name: row.get(1)?,
        test_type: row.get(2)?,
        result: row.get(3)?,
        test_date: DateTime::parse_from_rfc3339(&date_str)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
            })?,
        notes: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::TimeZone;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_test(patient: &str, day: u32) -> DiagnosticTest {
        DiagnosticTest {
            id: Uuid::new_v4(),
            patient_name: patient.into(),
            test_type: "Lipid panel".into(),
            result: "LDL 130 mg/dL".into(),
            test_date: Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn insert_and_retrieve() {
        let conn = test_db();
        let mut test = make_test("Jane Doe", 1);
        test.notes = Some("fasting".into());
        insert_diagnostic_test(&conn, &test).unwrap();

        let stored = get_diagnostic_test(&conn, &test.id).unwrap().unwrap();
        assert_eq!(stored, test);
    }

    #[test]
    fn get_unknown_returns_none() {
        let conn = test_db();
        assert!(get_diagnostic_test(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn list_orders_by_test_date_descending() {
        let conn = test_db();
        insert_diagnostic_test(&conn, &make_test("Older", 1)).unwrap();
        insert_diagnostic_test(&conn, &make_test("Newer", 20)).unwrap();
        insert_diagnostic_test(&conn, &make_test("Middle", 10)).unwrap();

        let names: Vec<_> = get_all_diagnostic_tests(&conn)
            .unwrap()
            .into_iter()
            .map(|t| t.patient_name)
            .collect();
        assert_eq!(names, vec!["Newer", "Middle", "Older"]);
    }

    #[test]
    fn update_replaces_fields() {
        let conn = test_db();
        let mut test = make_test("Jane Doe", 1);
        insert_diagnostic_test(&conn, &test).unwrap();

        test.result = "LDL 95 mg/dL".into();
        test.notes = Some("retest".into());
        update_diagnostic_test(&conn, &test).unwrap();

        let stored = get_diagnostic_test(&conn, &test.id).unwrap().unwrap();
        assert_eq!(stored.result, "LDL 95 mg/dL");
        assert_eq!(stored.notes.as_deref(), Some("retest"));
    }

    #[test]
    fn update_nonexistent_fails() {
        let conn = test_db();
        let result = update_diagnostic_test(&conn, &make_test("Ghost", 1));
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn delete_works() {
        let conn = test_db();
        let test = make_test("Jane Doe", 1);
        insert_diagnostic_test(&conn, &test).unwrap();

        delete_diagnostic_test(&conn, &test.id).unwrap();
        assert!(get_diagnostic_test(&conn, &test.id).unwrap().is_none());
    }

    #[test]
    fn delete_nonexistent_fails() {
        let conn = test_db();
        let result = delete_diagnostic_test(&conn, &Uuid::new_v4());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let conn = test_db();
        let test = make_test("Jane Doe", 1);
        insert_diagnostic_test(&conn, &test).unwrap();
        assert!(matches!(
            insert_diagnostic_test(&conn, &test),
            Err(DatabaseError::Sqlite(_))
        ));
    }
}
