//! Ratatui front-end: the book grid, the query bar, and the modal forms.

mod app;
mod dispatch;
mod forms;
pub mod grid;
mod helpers;
mod terminal;

pub use app::App;
pub use dispatch::{classify, CellAction};
pub use forms::FormOutcome;
pub use grid::{Grid, GridColumn, GridRow, RecordRow};
pub use terminal::run_app;
