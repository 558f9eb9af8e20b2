//! Maps a cell activation to the store operation it stands for. Kept free of
//! terminal and database handles so the routing table is easy to test.

use crate::models::{BookField, LoanAction};

use super::grid::{Grid, GridColumn};

/// What activating a grid cell should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellAction {
    /// Open the create form (id column of the sentinel row).
    Create,
    /// Delete the record shown on `row`.
    Delete { row: usize, id: i64 },
    /// Apply the borrow/return action to the record on `row`.
    Toggle {
        row: usize,
        id: i64,
        action: LoanAction,
    },
    /// Open the edit form for one field, pre-filled with `current`.
    Edit {
        row: usize,
        id: i64,
        field: BookField,
        current: String,
    },
    Ignore,
}

/// Classify an activation at (`row`, `column`). Out-of-range coordinates,
/// sentinel cells other than "+", the id column of records, and action cells
/// whose status has no mapped action all resolve to [`CellAction::Ignore`].
pub fn classify(grid: &Grid, row: usize, column: usize) -> CellAction {
    if row >= grid.row_count() || column >= grid.column_count() {
        return CellAction::Ignore;
    }

    if grid.is_sentinel(row) {
        return if column == 0 {
            CellAction::Create
        } else {
            CellAction::Ignore
        };
    }

    let Some(id) = grid.record_id(row) else {
        return CellAction::Ignore;
    };

    match grid.column_kind(column) {
        Some(GridColumn::Delete) => CellAction::Delete { row, id },
        Some(GridColumn::Action) => {
            let status = grid
                .cell(row, BookField::Status.grid_column())
                .unwrap_or_default();
            match LoanAction::for_status(status) {
                Some(action) => CellAction::Toggle { row, id, action },
                None => CellAction::Ignore,
            }
        }
        Some(GridColumn::Field(field)) => CellAction::Edit {
            row,
            id,
            field,
            current: grid.cell(row, column).unwrap_or_default().to_string(),
        },
        Some(GridColumn::Id) | None => CellAction::Ignore,
    }
}
