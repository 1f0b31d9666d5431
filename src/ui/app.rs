use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{delete_record, fetch_all_records, insert_record, search_records, update_status};
use crate::models::AdmissionRecord;

use super::forms::{ConfirmDelete, RecordField, RecordForm, StatusPicker};
use super::helpers::{centered_rect, ellipsize};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Widest a record name may render inside a confirmation prompt.
const PROMPT_NAME_WIDTH: usize = 40;

/// Fine-grained modes layered over the admissions table. Keeping this explicit
/// makes it easy to reason about which rendering path runs and what keyboard
/// shortcuts should do.
enum Mode {
    Normal,
    AddingRecord(RecordForm),
    UpdatingStatus(StatusPicker),
    ConfirmDelete(ConfirmDelete),
    Searching(SearchState),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    records: Vec<AdmissionRecord>,
    selected: usize,
    active_query: Option<String>,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, records: Vec<AdmissionRecord>) -> Self {
        Self {
            conn,
            records,
            selected: 0,
            active_query: None,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingRecord(form) => self.handle_add_record(code, form)?,
            Mode::UpdatingStatus(picker) => self.handle_status_picker(code, picker)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching(state) => self.handle_search(code, state),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-5),
            KeyCode::PageDown => self.move_selection(5),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingRecord(RecordForm::default()));
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                if let Some(record) = self.current_record().cloned() {
                    self.clear_status();
                    return Ok(Mode::UpdatingStatus(StatusPicker::from_record(&record)));
                }
                self.set_status("Select a record to update first.", StatusKind::Error);
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') => {
                if let Some(record) = self.current_record().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete::from_record(&record)));
                }
                self.set_status("Select a record to delete first.", StatusKind::Error);
            }
            KeyCode::Char('/') | KeyCode::Char('f') | KeyCode::Char('F') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchState {
                    query: String::new(),
                }));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.show_all()?;
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_record(&mut self, code: KeyCode, mut form: RecordForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.toggle_field_back(),
            KeyCode::Left => {
                form.cycle_status(false);
            }
            KeyCode::Right => {
                form.cycle_status(true);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match insert_record(&self.conn, &form.to_new_record()) {
                Ok(record) => {
                    self.refresh(Some(record.id))?;
                    self.set_status(
                        format!("Student '{}' added successfully!", record.name),
                        StatusKind::Info,
                    );
                    keep_open = false;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingRecord(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_status_picker(&mut self, code: KeyCode, mut picker: StatusPicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Update cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Left | KeyCode::Up => {
                picker.previous();
                Ok(Mode::UpdatingStatus(picker))
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                picker.next();
                Ok(Mode::UpdatingStatus(picker))
            }
            KeyCode::Enter => match update_status(&self.conn, picker.id, picker.status) {
                Ok(()) => {
                    self.refresh(Some(picker.id))?;
                    self.set_status(
                        format!("Status updated to '{}'.", picker.status),
                        StatusKind::Info,
                    );
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    self.refresh(None)?;
                    self.set_status(err.to_string(), StatusKind::Error);
                    Ok(Mode::Normal)
                }
            },
            _ => Ok(Mode::UpdatingStatus(picker)),
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match delete_record(&self.conn, confirm.id) {
                    Ok(()) => {
                        self.refresh(None)?;
                        self.set_status("Record deleted successfully.", StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.refresh(None)?;
                        self.set_status(err.to_string(), StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                Mode::Normal
            }
            KeyCode::Enter => {
                match self.apply_search(&state.query) {
                    Ok(()) => {}
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
                Mode::Normal
            }
            KeyCode::Backspace => {
                state.query.pop();
                Mode::Searching(state)
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
                Mode::Searching(state)
            }
            _ => Mode::Searching(state),
        }
    }

    /// Ctrl+L resets the add form, mirroring the "clear fields" button of a
    /// classic form UI. A plain character cannot do this because typing must
    /// keep working inside the text fields.
    pub(crate) fn handle_ctrl_l(&mut self) -> Result<()> {
        if let Mode::AddingRecord(form) = &mut self.mode {
            form.clear();
            self.set_status("Fields cleared.", StatusKind::Info);
        }
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_record_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingRecord(form) => self.draw_record_form(frame, area, form),
            Mode::UpdatingStatus(picker) => self.draw_status_picker(frame, area, picker),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_record_table(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.active_query {
            Some(query) => format!("Admissions (filter: '{query}')"),
            None => "Admissions".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.records.is_empty() {
            let message = if self.active_query.is_some() {
                "No records match the current search."
            } else {
                "No records yet. Press 'a' to add one."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(["ID", "Name", "Roll No", "Course", "Email", "Phone", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.records.iter().map(|record| {
            Row::new(vec![
                Cell::from(record.id.to_string()),
                Cell::from(record.name.clone()),
                Cell::from(record.roll_no.clone()),
                Cell::from(record.course.clone()),
                Cell::from(record.email.clone()),
                Cell::from(record.phone.clone()),
                Cell::from(record.status.as_str()),
            ])
        });

        let widths = [
            Constraint::Length(5),
            Constraint::Min(14),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(18),
            Constraint::Length(12),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = TableState::default();
        state.select(Some(self.selected.min(self.records.len() - 1)));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Normal => Line::from(vec![
                Span::styled("[\u{2191}\u{2193}]", key_style),
                Span::raw(" Select   "),
                Span::styled("[a]", key_style),
                Span::raw(" Add   "),
                Span::styled("[u]", key_style),
                Span::raw(" Update Status   "),
                Span::styled("[d]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[/]", key_style),
                Span::raw(" Search   "),
                Span::styled("[s]", key_style),
                Span::raw(" Show All   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            Mode::AddingRecord(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[\u{2190}\u{2192}]", key_style),
                Span::raw(" Status   "),
                Span::styled("[Ctrl+L]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::UpdatingStatus(_) => Line::from(vec![
                Span::styled("[\u{2190}\u{2192}]", key_style),
                Span::raw(" Choose Status   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Apply   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N]", key_style),
                Span::raw(" Keep   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Searching(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
        }
    }

    fn draw_record_form(&self, frame: &mut Frame, area: Rect, form: &RecordForm) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Record").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line<'static>> = RecordField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Name, Roll No, and Course are required.",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        // The status selector has no text cursor; every other field does.
        if form.active != RecordField::Status {
            let row = RecordField::ALL
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            let prefix = form.active.label().len() as u16 + 2;
            let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
            let cursor_y = inner.y + row;
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_status_picker(&self, frame: &mut Frame, area: Rect, picker: &StatusPicker) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Update Status").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Set status for {}:",
                ellipsize(&picker.name, PROMPT_NAME_WIDTH)
            )),
            Line::from(""),
            Line::from(vec![Span::styled(
                format!("< {} >", picker.status),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(Span::styled(
                "Use \u{2190}/\u{2192} to choose, Enter to apply, Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete record for {}?",
                ellipsize(&confirm.name, PROMPT_NAME_WIDTH)
            )),
            Line::from("This removes the record permanently."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Name or Roll No: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Name or Roll No: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Re-run the query currently backing the table (the active search, or the
    /// full set) and keep the selection sensible, optionally snapping it to a
    /// specific record.
    fn refresh(&mut self, focus_id: Option<i64>) -> Result<()> {
        self.records = match &self.active_query {
            Some(query) => search_records(&self.conn, query)?,
            None => fetch_all_records(&self.conn)?,
        };

        if self.records.is_empty() {
            self.selected = 0;
            return Ok(());
        }

        if let Some(id) = focus_id {
            if let Some(idx) = self.records.iter().position(|record| record.id == id) {
                self.selected = idx;
                return Ok(());
            }
        }

        if self.selected >= self.records.len() {
            self.selected = self.records.len() - 1;
        }

        Ok(())
    }

    /// Replace the displayed rows with the search result. An all-whitespace
    /// query is the same as showing everything.
    fn apply_search(&mut self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return self.show_all();
        }

        self.records = search_records(&self.conn, query)?;
        self.active_query = Some(query.to_string());
        self.selected = 0;
        let count = self.records.len();
        let plural = if count == 1 { "" } else { "s" };
        self.set_status(
            format!("{count} record{plural} match '{query}'."),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Drop any active filter and reload the full set.
    fn show_all(&mut self) -> Result<()> {
        self.active_query = None;
        self.refresh(None)?;
        self.set_status("Showing all records.", StatusKind::Info);
        Ok(())
    }

    fn current_record(&self) -> Option<&AdmissionRecord> {
        self.records.get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        if self.records.is_empty() {
            return;
        }
        let len = self.records.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    fn select_first(&mut self) {
        if !self.records.is_empty() {
            self.selected = 0;
        }
    }

    fn select_last(&mut self) {
        if !self.records.is_empty() {
            self.selected = self.records.len() - 1;
        }
    }
}
