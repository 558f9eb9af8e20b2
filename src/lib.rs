//! Core library surface for the book inventory TUI.
//!
//! The `bin` target only wires these pieces together; integration tests drive
//! the same [`App`] through key presses against an in-memory database.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Config;
pub use db::{open_database, BookFilter, FilterMode, QueryError};
pub use logging::init_logging;
pub use models::{Book, BookField, LoanAction, NewBook};
pub use ui::{run_app, App};
