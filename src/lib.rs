//! Core library surface for the admission manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces.

pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer. These are what `main.rs`
/// uses to bring up the SQLite store and load the initial result set.
pub use db::{fetch_all_records, open_store};

/// The domain types other layers manipulate.
pub use models::{AdmissionRecord, NewRecord, Status};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
