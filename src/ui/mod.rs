//! Ratatui front-end for the admission manager, split across logical
//! submodules: application state and rendering, form state, terminal
//! plumbing, and small layout helpers.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
