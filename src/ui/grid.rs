//! In-memory mirror of the `books` rows shown in the main table. The store is
//! always the source of truth; this projection is rebuilt by [`Grid::load`] or
//! patched in place right after a confirmed mutation.

use rusqlite::Connection;

use crate::db::{fetch_books, BookFilter, QueryError};
use crate::models::{action_label, Book, BookField};

/// Text of the trailing "add" row.
pub const SENTINEL_LABEL: &str = "+";
/// Text of every cell in the delete column.
pub const DELETE_MARKER: &str = "X";

const ID_HEADER: &str = "ID";
const ACTION_HEADER: &str = "操作";
const DELETE_HEADER: &str = "删除";

/// What a grid column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridColumn {
    Id,
    Field(BookField),
    /// Borrow/return label derived from the status cell.
    Action,
    Delete,
}

/// A displayed record: its id plus one text cell per grid column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: i64,
    cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    Record(RecordRow),
    /// The synthetic "+" row. Never persisted, always last.
    Add,
}

/// Rows of the main table. Holds exactly one [`GridRow::Add`], at the end.
#[derive(Debug, Clone)]
pub struct Grid {
    loan_actions: bool,
    rows: Vec<GridRow>,
}

impl Grid {
    /// Empty grid. `loan_actions` adds the borrow/return column before the
    /// delete column.
    pub fn new(loan_actions: bool) -> Self {
        Self {
            loan_actions,
            rows: vec![GridRow::Add],
        }
    }

    /// Replace every row with the books matching `filter`. When the query
    /// fails the current rows stay exactly as they were.
    pub fn load(&mut self, conn: &Connection, filter: &BookFilter) -> Result<usize, QueryError> {
        let books = fetch_books(conn, filter)?;
        self.replace(&books);
        Ok(books.len())
    }

    /// Rebuild the rows from an already-fetched listing.
    pub fn replace(&mut self, books: &[Book]) {
        let mut rows: Vec<GridRow> = books
            .iter()
            .map(|book| GridRow::Record(self.project(book)))
            .collect();
        rows.push(GridRow::Add);
        self.rows = rows;
    }

    /// Overwrite one displayed cell of a record row. The id column and the
    /// sentinel row are never patched.
    pub fn patch_cell(&mut self, row: usize, column: usize, value: &str) -> bool {
        if matches!(self.column_kind(column), None | Some(GridColumn::Id)) {
            return false;
        }
        match self.rows.get_mut(row) {
            Some(GridRow::Record(record)) => match record.cells.get_mut(column) {
                Some(cell) => {
                    *cell = value.to_string();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Add a freshly inserted book just above the sentinel.
    pub fn append_created(&mut self, book: &Book) {
        if matches!(self.rows.last(), Some(GridRow::Add)) {
            self.rows.pop();
        }
        let projected = self.project(book);
        self.rows.push(GridRow::Record(projected));
        self.rows.push(GridRow::Add);
    }

    /// Drop a record row after its store row has been deleted. Returns the
    /// removed row; the sentinel cannot be removed.
    pub fn remove(&mut self, row: usize) -> Option<RecordRow> {
        if row >= self.sentinel_row() {
            return None;
        }
        match self.rows.remove(row) {
            GridRow::Record(record) => Some(record),
            GridRow::Add => None,
        }
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of record rows, i.e. everything except the sentinel.
    pub fn record_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn sentinel_row(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn is_sentinel(&self, row: usize) -> bool {
        row == self.sentinel_row()
    }

    pub fn column_count(&self) -> usize {
        BookField::ALL.len() + if self.loan_actions { 3 } else { 2 }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        (0..self.column_count())
            .filter_map(|column| self.column_kind(column))
            .map(|kind| match kind {
                GridColumn::Id => ID_HEADER,
                GridColumn::Field(field) => field.label(),
                GridColumn::Action => ACTION_HEADER,
                GridColumn::Delete => DELETE_HEADER,
            })
            .collect()
    }

    pub fn column_kind(&self, column: usize) -> Option<GridColumn> {
        let count = self.column_count();
        if column == 0 {
            Some(GridColumn::Id)
        } else if let Some(field) = BookField::from_grid_column(column) {
            Some(GridColumn::Field(field))
        } else if column + 1 == count {
            Some(GridColumn::Delete)
        } else if self.loan_actions && column + 2 == count {
            Some(GridColumn::Action)
        } else {
            None
        }
    }

    /// Index of the action column, when this grid has one.
    pub fn action_column(&self) -> Option<usize> {
        self.loan_actions.then(|| self.column_count() - 2)
    }

    pub fn delete_column(&self) -> usize {
        self.column_count() - 1
    }

    /// Displayed text at (`row`, `column`). The sentinel shows "+" in the id
    /// column and nothing elsewhere.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.column_count() {
            return None;
        }
        match self.rows.get(row)? {
            GridRow::Record(record) => record.cells.get(column).map(String::as_str),
            GridRow::Add => Some(if column == 0 { SENTINEL_LABEL } else { "" }),
        }
    }

    pub fn record_id(&self, row: usize) -> Option<i64> {
        match self.rows.get(row)? {
            GridRow::Record(record) => Some(record.id),
            GridRow::Add => None,
        }
    }

    fn project(&self, book: &Book) -> RecordRow {
        let mut cells = Vec::with_capacity(self.column_count());
        cells.push(book.id.to_string());
        cells.extend(BookField::ALL.iter().map(|field| book.field(*field).to_string()));
        if self.loan_actions {
            cells.push(action_label(&book.status).to_string());
        }
        cells.push(DELETE_MARKER.to_string());
        RecordRow { id: book.id, cells }
    }
}
