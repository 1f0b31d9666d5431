//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. The intent is that these types stay light-weight data holders so other
//! layers can focus on presentation and persistence logic. Keeping the
//! commentary here means later refactors can reconstruct the assumptions even
//! if other context is lost.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;

/// Admission decision state. Modeled as a closed enum rather than free text so
/// the store can only ever persist one of the three known values; anything
/// else fails at the type boundary instead of leaking into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Status {
    /// Canonical text stored in the `status` column and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Approved => "Approved",
            Status::Rejected => "Rejected",
        }
    }

    /// Parse the canonical text back into the enum. Returns `None` for any
    /// unknown value so callers decide how strictly to react.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Pending" => Some(Status::Pending),
            "Approved" => Some(Status::Approved),
            "Rejected" => Some(Status::Rejected),
            _ => None,
        }
    }

    /// Advance to the next status in display order, wrapping around. Drives
    /// the selector widget in the add form and the update-status dialog.
    pub fn cycle(self) -> Self {
        match self {
            Status::Pending => Status::Approved,
            Status::Approved => Status::Rejected,
            Status::Rejected => Status::Pending,
        }
    }

    /// Step backwards through the cycle, for Left-arrow navigation.
    pub fn cycle_back(self) -> Self {
        match self {
            Status::Pending => Status::Rejected,
            Status::Approved => Status::Pending,
            Status::Rejected => Status::Approved,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromSql for Status {
    /// Read the TEXT column straight into the enum. Rows written by this
    /// application always parse; a hand-edited database surfaces as a column
    /// conversion error rather than a silent default.
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Status::parse(text).ok_or_else(|| {
            FromSqlError::Other(format!("unknown admission status '{text}'").into())
        })
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[derive(Debug, Clone)]
/// In-memory representation of one admission entry, mirroring a row in the
/// `admissions` table.
pub struct AdmissionRecord {
    /// Primary key from the database. Kept around even when the UI only needs
    /// display information because update/delete flows bubble the id back to
    /// the persistence layer.
    pub id: i64,
    /// Applicant name. Unique across all records; the table enforces it.
    pub name: String,
    /// Roll number. Required but deliberately not unique.
    pub roll_no: String,
    /// Course the applicant enrolled for.
    pub course: String,
    /// Contact email, free text, optional.
    pub email: String,
    /// Contact phone, free text, optional.
    pub phone: String,
    /// The only field that can change after creation.
    pub status: Status,
}

/// Field values collected from the add form before a record exists. Trimming
/// happens when the form is parsed; presence validation belongs to the store.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub name: String,
    pub roll_no: String,
    pub course: String,
    pub email: String,
    pub phone: String,
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [Status::Pending, Status::Approved, Status::Rejected] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_rejects_unknown_text() {
        assert_eq!(Status::parse("Waitlisted"), None);
        assert_eq!(Status::parse("pending"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn status_cycle_visits_all_values() {
        let start = Status::Pending;
        let second = start.cycle();
        let third = second.cycle();
        assert_eq!(second, Status::Approved);
        assert_eq!(third, Status::Rejected);
        assert_eq!(third.cycle(), start);
        assert_eq!(start.cycle_back(), Status::Rejected);
    }
}
