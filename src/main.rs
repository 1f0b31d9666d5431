//! Binary entry point that glues the SQLite-backed record store to the TUI:
//! open the database (creating schema and sample rows on first run), hydrate
//! the initial table contents, and drive the Ratatui event loop until the
//! user exits.

use admission_manager::{fetch_all_records, open_store, run_app, App};

/// Initialize persistence, load the current records, and launch the event
/// loop. Returning a `Result` bubbles up fatal initialization problems (for
/// example an unwritable data directory) to the terminal instead of crashing
/// silently.
fn main() -> anyhow::Result<()> {
    let conn = open_store()?;
    let records = fetch_all_records(&conn)?;

    let mut app = App::new(conn, records);
    run_app(&mut app)
}
