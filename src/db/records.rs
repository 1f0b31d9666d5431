//! CRUD operations for the `admissions` table. Every function here wraps one
//! SQL statement so the UI layer can stay focused on collecting input and
//! re-rendering results.

use rusqlite::{params, Connection, Error as SqlError, ErrorCode};
use thiserror::Error;

use crate::models::{AdmissionRecord, NewRecord, Status};

/// Everything that can go wrong inside the record store. The first three
/// variants are part of the store contract and get shown verbatim in the UI
/// footer; `Sql` covers genuine database failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Name, Roll No, and Course are required!")]
    Validation,
    #[error("Student '{0}' already exists! Names must be unique.")]
    DuplicateName(String),
    #[error("No record found with id {0}.")]
    NotFound(i64),
    #[error(transparent)]
    Sql(#[from] SqlError),
}

/// Insert a new admission record, returning the hydrated struct so the caller
/// can refresh its view without re-querying. Required fields must be non-empty
/// after trimming; the name must not collide with an existing record. The
/// store is left untouched on either failure.
pub fn insert_record(conn: &Connection, record: &NewRecord) -> Result<AdmissionRecord, StoreError> {
    let name = record.name.trim();
    let roll_no = record.roll_no.trim();
    let course = record.course.trim();
    if name.is_empty() || roll_no.is_empty() || course.is_empty() {
        return Err(StoreError::Validation);
    }
    let email = record.email.trim();
    let phone = record.phone.trim();

    conn.execute(
        "INSERT INTO admissions (name, roll_no, course, email, phone, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![name, roll_no, course, email, phone, record.status],
    )
    .map_err(|err| map_unique_constraint(err, name))?;

    let id = conn.last_insert_rowid();
    Ok(AdmissionRecord {
        id,
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        course: course.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        status: record.status,
    })
}

/// Retrieve every record in insertion order. `id` is monotonic, so ordering by
/// it doubles as insertion order; the query is the single source of truth for
/// how rows appear in the table view.
pub fn fetch_all_records(conn: &Connection) -> Result<Vec<AdmissionRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, roll_no, course, email, phone, status
         FROM admissions ORDER BY id",
    )?;

    let records = stmt
        .query_map([], record_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Return records whose name or roll number contains `query` as a substring.
/// SQLite's LIKE is case-insensitive for ASCII, which is the conventional
/// behavior for a search box. An empty query matches everything.
pub fn search_records(conn: &Connection, query: &str) -> Result<Vec<AdmissionRecord>, StoreError> {
    let pattern = format!("%{}%", escape_like(query));
    let mut stmt = conn.prepare(
        "SELECT id, name, roll_no, course, email, phone, status
         FROM admissions
         WHERE name LIKE ?1 ESCAPE '\\' OR roll_no LIKE ?1 ESCAPE '\\'
         ORDER BY id",
    )?;

    let records = stmt
        .query_map([pattern], record_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Set the status of one record, leaving every other field untouched. Zero
/// affected rows means the id does not exist.
pub fn update_status(conn: &Connection, id: i64, status: Status) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE admissions SET status = ?1 WHERE id = ?2",
        params![status, id],
    )?;

    if updated == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}

/// Permanently remove one record. There is no soft delete; a repeated call
/// with the same id reports `NotFound`.
pub fn delete_record(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM admissions WHERE id = ?1", params![id])?;

    if deleted == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}

/// Shared row-to-struct mapping for the two query paths.
fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AdmissionRecord> {
    Ok(AdmissionRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        roll_no: row.get(2)?,
        course: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        status: row.get(6)?,
    })
}

/// Coerce SQLite constraint errors into the duplicate-name variant. The only
/// constraint an insert can trip is the UNIQUE index on `name`.
fn map_unique_constraint(err: SqlError, name: &str) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::DuplicateName(name.to_string())
    } else {
        StoreError::Sql(err)
    }
}

/// Escape LIKE wildcards so a query containing `%` or `_` matches those
/// characters literally instead of acting as a pattern.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ensure_schema, seed_sample_records};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn sample(name: &str, roll_no: &str) -> NewRecord {
        NewRecord {
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            course: "CS".to_string(),
            email: "a@b.com".to_string(),
            phone: "123".to_string(),
            status: Status::Pending,
        }
    }

    #[test]
    fn insert_returns_hydrated_record() {
        let conn = test_conn();
        let record = insert_record(&conn, &sample("Test User", "R1")).unwrap();

        assert!(record.id > 0);
        let all = fetch_all_records(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, record.id);
        assert_eq!(all[0].name, "Test User");
        assert_eq!(all[0].roll_no, "R1");
        assert_eq!(all[0].course, "CS");
        assert_eq!(all[0].email, "a@b.com");
        assert_eq!(all[0].phone, "123");
        assert_eq!(all[0].status, Status::Pending);
    }

    #[test]
    fn insert_trims_whitespace() {
        let conn = test_conn();
        let record = insert_record(&conn, &sample("  Padded Name  ", " R2 ")).unwrap();
        assert_eq!(record.name, "Padded Name");
        assert_eq!(record.roll_no, "R2");
    }

    #[test]
    fn insert_rejects_missing_required_fields() {
        let conn = test_conn();

        let mut missing_name = sample("", "R1");
        assert!(matches!(
            insert_record(&conn, &missing_name),
            Err(StoreError::Validation)
        ));
        missing_name.name = "   ".to_string();
        assert!(matches!(
            insert_record(&conn, &missing_name),
            Err(StoreError::Validation)
        ));

        let missing_roll = sample("Someone", " ");
        assert!(matches!(
            insert_record(&conn, &missing_roll),
            Err(StoreError::Validation)
        ));

        let mut missing_course = sample("Someone", "R1");
        missing_course.course = String::new();
        assert!(matches!(
            insert_record(&conn, &missing_course),
            Err(StoreError::Validation)
        ));

        assert!(fetch_all_records(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicate_name_leaves_store_unchanged() {
        let conn = test_conn();
        insert_record(&conn, &sample("Aarav Sharma", "R1")).unwrap();
        let before = fetch_all_records(&conn).unwrap();

        let err = insert_record(&conn, &sample("Aarav Sharma", "R2")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "Aarav Sharma"));

        let after = fetch_all_records(&conn).unwrap();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0].roll_no, before[0].roll_no);
        assert_eq!(after[0].status, before[0].status);
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let conn = test_conn();
        insert_record(&conn, &sample("Aarav Sharma", "R1")).unwrap();
        // A differently-cased name is a distinct record.
        insert_record(&conn, &sample("aarav sharma", "R2")).unwrap();
        assert_eq!(fetch_all_records(&conn).unwrap().len(), 2);
    }

    #[test]
    fn update_status_touches_only_the_target_row() {
        let conn = test_conn();
        let first = insert_record(&conn, &sample("First", "R1")).unwrap();
        let second = insert_record(&conn, &sample("Second", "R2")).unwrap();

        update_status(&conn, first.id, Status::Approved).unwrap();

        let all = fetch_all_records(&conn).unwrap();
        let updated = all.iter().find(|r| r.id == first.id).unwrap();
        let untouched = all.iter().find(|r| r.id == second.id).unwrap();
        assert_eq!(updated.status, Status::Approved);
        assert_eq!(updated.name, "First");
        assert_eq!(updated.roll_no, "R1");
        assert_eq!(untouched.status, Status::Pending);
    }

    #[test]
    fn update_status_unknown_id_is_not_found() {
        let conn = test_conn();
        let err = update_status(&conn, 999, Status::Approved).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let conn = test_conn();
        let first = insert_record(&conn, &sample("First", "R1")).unwrap();
        let second = insert_record(&conn, &sample("Second", "R2")).unwrap();

        delete_record(&conn, first.id).unwrap();

        let all = fetch_all_records(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, second.id);

        let err = delete_record(&conn, first.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == first.id));
    }

    #[test]
    fn search_matches_name_or_roll_no_case_insensitively() {
        let conn = test_conn();
        insert_record(&conn, &sample("Aarav Sharma", "25MCA1001")).unwrap();
        insert_record(&conn, &sample("Priya Patel", "25MCA1002")).unwrap();
        insert_record(&conn, &sample("Rohan Mehta", "SHARMA99")).unwrap();

        let by_name = search_records(&conn, "sharma").unwrap();
        assert_eq!(by_name.len(), 2);
        assert!(by_name
            .iter()
            .all(|r| r.name.to_lowercase().contains("sharma")
                || r.roll_no.to_lowercase().contains("sharma")));

        let by_roll = search_records(&conn, "1002").unwrap();
        assert_eq!(by_roll.len(), 1);
        assert_eq!(by_roll[0].name, "Priya Patel");
    }

    #[test]
    fn empty_search_returns_the_full_set() {
        let conn = test_conn();
        insert_record(&conn, &sample("First", "R1")).unwrap();
        insert_record(&conn, &sample("Second", "R2")).unwrap();

        let all = fetch_all_records(&conn).unwrap();
        let searched = search_records(&conn, "").unwrap();
        assert_eq!(searched.len(), all.len());
        assert!(searched.iter().zip(&all).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn search_treats_like_wildcards_literally() {
        let conn = test_conn();
        insert_record(&conn, &sample("Percent Person", "R%1")).unwrap();
        insert_record(&conn, &sample("Other Person", "R21")).unwrap();

        let matched = search_records(&conn, "R%").unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].roll_no, "R%1");
    }

    #[test]
    fn records_come_back_in_insertion_order() {
        let conn = test_conn();
        for (idx, name) in ["Charlie", "Alice", "Bob"].iter().enumerate() {
            insert_record(&conn, &sample(name, &format!("R{idx}"))).unwrap();
        }

        let all = fetch_all_records(&conn).unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Charlie", "Alice", "Bob"]);
        assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn seeding_is_idempotent() {
        let conn = test_conn();
        seed_sample_records(&conn).unwrap();
        assert_eq!(fetch_all_records(&conn).unwrap().len(), 10);

        seed_sample_records(&conn).unwrap();
        assert_eq!(fetch_all_records(&conn).unwrap().len(), 10);
    }

    #[test]
    fn seeding_skips_existing_names_silently() {
        let conn = test_conn();
        let existing = insert_record(&conn, &sample("Priya Patel", "CUSTOM1")).unwrap();

        seed_sample_records(&conn).unwrap();

        let all = fetch_all_records(&conn).unwrap();
        assert_eq!(all.len(), 10);
        let priya = all.iter().find(|r| r.name == "Priya Patel").unwrap();
        // The pre-existing row wins; the sample version is dropped.
        assert_eq!(priya.id, existing.id);
        assert_eq!(priya.roll_no, "CUSTOM1");
    }
}
