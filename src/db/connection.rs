use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::{params, Connection};

use crate::models::Status;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".admission-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "admissions.sqlite";

/// Example records inserted on first run so the table is not empty. Rows whose
/// name already exists are skipped silently, which keeps repeated startups
/// from duplicating or reporting anything.
const SAMPLE_RECORDS: &[(&str, &str, &str, &str, &str, Status)] = &[
    ("Aarav Sharma", "25MCA1001", "MCA", "aarav@example.com", "9876543210", Status::Approved),
    ("Priya Patel", "25MCA1002", "MCA", "priya@example.com", "9876501234", Status::Pending),
    ("Rohan Mehta", "25BTECH1003", "B.Tech", "rohan@example.com", "9988776655", Status::Approved),
    ("Isha Gupta", "25BBA1004", "BBA", "isha@example.com", "9090909090", Status::Rejected),
    ("Karan Singh", "25BSC1005", "B.Sc", "karan@example.com", "9123456789", Status::Pending),
    ("Neha Verma", "25MBA1006", "MBA", "neha@example.com", "9876123450", Status::Approved),
    ("Vikram Das", "25BCA1007", "BCA", "vikram@example.com", "9988001122", Status::Pending),
    ("Sneha Reddy", "25MCOM1008", "M.Com", "sneha@example.com", "9001122334", Status::Approved),
    ("Aditya Rao", "25MSC1009", "M.Sc", "aditya@example.com", "9123459000", Status::Rejected),
    ("Simran Kaur", "25BA1010", "B.A", "simran@example.com", "9900887766", Status::Pending),
];

/// Open (creating if needed) the on-disk store and bring it to a usable state:
/// data directory present, schema applied, sample rows seeded. Safe to call on
/// every startup.
pub fn open_store() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    seed_sample_records(&conn)?;

    Ok(conn)
}

/// Create the `admissions` table if it does not exist. The UNIQUE constraint
/// on `name` is the single enforcement point for the duplicate-name rule.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS admissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            roll_no TEXT NOT NULL,
            course TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            status TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create admissions table")?;

    Ok(())
}

/// Insert the sample data set. `INSERT OR IGNORE` makes the call idempotent:
/// any row colliding with an existing name is dropped without an error.
pub fn seed_sample_records(conn: &Connection) -> Result<()> {
    for &(name, roll_no, course, email, phone, status) in SAMPLE_RECORDS {
        conn.execute(
            "INSERT OR IGNORE INTO admissions (name, roll_no, course, email, phone, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![name, roll_no, course, email, phone, status],
        )
        .context("failed to seed sample record")?;
    }

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
