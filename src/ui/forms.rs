use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{AdmissionRecord, NewRecord, Status};

/// Internal representation of the "add record" form fields.
#[derive(Default, Clone)]
pub(crate) struct RecordForm {
    pub(crate) name: String,
    pub(crate) roll_no: String,
    pub(crate) course: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) status: Status,
    pub(crate) active: RecordField,
    pub(crate) error: Option<String>,
}

/// Fields available within the record form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum RecordField {
    #[default]
    Name,
    RollNo,
    Course,
    Email,
    Phone,
    Status,
}

impl RecordField {
    /// Every form field in the order they are rendered and focused.
    pub(crate) const ALL: [RecordField; 6] = [
        RecordField::Name,
        RecordField::RollNo,
        RecordField::Course,
        RecordField::Email,
        RecordField::Phone,
        RecordField::Status,
    ];

    /// Label shown before the field value.
    pub(crate) fn label(self) -> &'static str {
        match self {
            RecordField::Name => "Name",
            RecordField::RollNo => "Roll No",
            RecordField::Course => "Course",
            RecordField::Email => "Email",
            RecordField::Phone => "Phone",
            RecordField::Status => "Status",
        }
    }

    fn next(self) -> Self {
        match self {
            RecordField::Name => RecordField::RollNo,
            RecordField::RollNo => RecordField::Course,
            RecordField::Course => RecordField::Email,
            RecordField::Email => RecordField::Phone,
            RecordField::Phone => RecordField::Status,
            RecordField::Status => RecordField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            RecordField::Name => RecordField::Status,
            RecordField::RollNo => RecordField::Name,
            RecordField::Course => RecordField::RollNo,
            RecordField::Email => RecordField::Course,
            RecordField::Phone => RecordField::Email,
            RecordField::Status => RecordField::Phone,
        }
    }

    fn is_required(self) -> bool {
        matches!(
            self,
            RecordField::Name | RecordField::RollNo | RecordField::Course
        )
    }
}

impl RecordForm {
    /// Move focus to the next field (Tab).
    pub(crate) fn toggle_field(&mut self) {
        self.active = self.active.next();
    }

    /// Move focus to the previous field (Shift+Tab).
    pub(crate) fn toggle_field_back(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active text field. The status field is a
    /// selector, not free text, so typed characters are swallowed there.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            RecordField::Name => self.name.push(ch),
            RecordField::RollNo => self.roll_no.push(ch),
            RecordField::Course => self.course.push(ch),
            RecordField::Email => self.email.push(ch),
            RecordField::Phone => self.phone.push(ch),
            RecordField::Status => return false,
        }
        true
    }

    /// Remove the last character from the active text field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            RecordField::Name => {
                self.name.pop();
            }
            RecordField::RollNo => {
                self.roll_no.pop();
            }
            RecordField::Course => {
                self.course.pop();
            }
            RecordField::Email => {
                self.email.pop();
            }
            RecordField::Phone => {
                self.phone.pop();
            }
            RecordField::Status => {}
        }
    }

    /// Cycle the status selector. Only reacts while the status field holds
    /// focus so arrow keys elsewhere stay inert.
    pub(crate) fn cycle_status(&mut self, forward: bool) -> bool {
        if self.active != RecordField::Status {
            return false;
        }
        self.status = if forward {
            self.status.cycle()
        } else {
            self.status.cycle_back()
        };
        true
    }

    /// Reset every field back to its default. Backs the "clear fields" action;
    /// status returns to Pending.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Collect trimmed values ready for the store. Presence validation is the
    /// store's job, so this never fails.
    pub(crate) fn to_new_record(&self) -> NewRecord {
        NewRecord {
            name: self.name.trim().to_string(),
            roll_no: self.roll_no.trim().to_string(),
            course: self.course.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            status: self.status,
        }
    }

    fn value(&self, field: RecordField) -> &str {
        match field {
            RecordField::Name => &self.name,
            RecordField::RollNo => &self.roll_no,
            RecordField::Course => &self.course,
            RecordField::Email => &self.email,
            RecordField::Phone => &self.phone,
            RecordField::Status => self.status.as_str(),
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: RecordField) -> Line<'static> {
        let is_active = self.active == field;

        if field == RecordField::Status {
            let style = if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            return Line::from(vec![
                Span::raw("Status: "),
                Span::styled(format!("< {} >", self.status), style),
            ]);
        }

        let value = self.value(field);
        let placeholder = if field.is_required() {
            "<required>"
        } else {
            "<optional>"
        };
        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field, for cursor
    /// placement.
    pub(crate) fn value_len(&self, field: RecordField) -> usize {
        self.value(field).chars().count()
    }
}

/// State for the delete confirmation dialog, carrying just enough of the
/// record to name it in the prompt.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl ConfirmDelete {
    pub(crate) fn from_record(record: &AdmissionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}

/// State for the update-status dialog: the target record plus the candidate
/// status being cycled through.
#[derive(Clone)]
pub(crate) struct StatusPicker {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) status: Status,
}

impl StatusPicker {
    /// Seed the picker with the record's current status so Enter without any
    /// cycling is a no-op update.
    pub(crate) fn from_record(record: &AdmissionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            status: record.status,
        }
    }

    pub(crate) fn next(&mut self) {
        self.status = self.status.cycle();
    }

    pub(crate) fn previous(&mut self) {
        self.status = self.status.cycle_back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycles_through_all_fields_and_wraps() {
        let mut form = RecordForm::default();
        for expected in RecordField::ALL {
            assert!(form.active == expected);
            form.toggle_field();
        }
        assert!(form.active == RecordField::Name);
        form.toggle_field_back();
        assert!(form.active == RecordField::Status);
    }

    #[test]
    fn push_char_rejects_control_characters() {
        let mut form = RecordForm::default();
        assert!(!form.push_char('\u{8}'));
        assert!(form.push_char('A'));
        assert_eq!(form.name, "A");
    }

    #[test]
    fn status_field_swallows_typed_characters() {
        let mut form = RecordForm::default();
        form.active = RecordField::Status;
        assert!(!form.push_char('x'));
        assert!(form.cycle_status(true));
        assert_eq!(form.status, Status::Approved);
        assert!(form.cycle_status(false));
        assert_eq!(form.status, Status::Pending);
    }

    #[test]
    fn arrow_keys_outside_status_field_are_inert() {
        let mut form = RecordForm::default();
        form.active = RecordField::Name;
        assert!(!form.cycle_status(true));
        assert_eq!(form.status, Status::Pending);
    }

    #[test]
    fn to_new_record_trims_every_field() {
        let mut form = RecordForm::default();
        form.name = "  Test User ".to_string();
        form.roll_no = " R1 ".to_string();
        form.course = " CS".to_string();
        form.email = " a@b.com ".to_string();
        form.phone = " 123 ".to_string();

        let record = form.to_new_record();
        assert_eq!(record.name, "Test User");
        assert_eq!(record.roll_no, "R1");
        assert_eq!(record.course, "CS");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.phone, "123");
    }

    #[test]
    fn clear_resets_fields_and_status() {
        let mut form = RecordForm {
            name: "Someone".to_string(),
            status: Status::Rejected,
            active: RecordField::Phone,
            error: Some("boom".to_string()),
            ..RecordForm::default()
        };
        form.clear();
        assert!(form.name.is_empty());
        assert_eq!(form.status, Status::Pending);
        assert!(form.active == RecordField::Name);
        assert!(form.error.is_none());
    }
}
