//! Domain models that mirror the `books` table and get passed throughout the
//! TUI. These types stay light-weight data holders so the grid and the
//! persistence layer can share them without conversion glue.

use std::fmt;

/// Status text for a book sitting on its shelf.
pub const STATUS_IN_STOCK: &str = "在库";
/// Status text for a book that has been lent out.
pub const STATUS_CHECKED_OUT: &str = "已借出";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `books` table. Every non-id column is free text; SQL `NULL`
/// is read back as the empty string so the grid never has to special-case it.
pub struct Book {
    /// Primary key assigned by SQLite on insert.
    pub id: i64,
    pub name: String,
    pub author: String,
    pub publish: String,
    pub isbn: String,
    pub status: String,
    pub location: String,
}

impl Book {
    /// Current text of one editable field.
    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Name => &self.name,
            BookField::Author => &self.author,
            BookField::Publish => &self.publish,
            BookField::Isbn => &self.isbn,
            BookField::Status => &self.status,
            BookField::Location => &self.location,
        }
    }

    /// Borrow/return action offered for this record, if its status is one of
    /// the two known values.
    pub fn loan_action(&self) -> Option<LoanAction> {
        LoanAction::for_status(&self.status)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.trim().is_empty() {
            write!(f, "#{}", self.id)
        } else {
            write!(f, "#{} {}", self.id, self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Field values collected by the create form before SQLite assigns an id.
pub struct NewBook {
    pub name: String,
    pub author: String,
    pub publish: String,
    pub isbn: String,
    pub status: String,
    pub location: String,
}

/// The six columns a user may edit. Column names only ever reach SQL text
/// through [`BookField::column`], so the set of writable identifiers is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Name,
    Author,
    Publish,
    Isbn,
    Status,
    Location,
}

impl BookField {
    /// Fields in grid order (grid columns 1 through 6).
    pub const ALL: [BookField; 6] = [
        BookField::Name,
        BookField::Author,
        BookField::Publish,
        BookField::Isbn,
        BookField::Status,
        BookField::Location,
    ];

    /// SQL column backing this field.
    pub fn column(self) -> &'static str {
        match self {
            BookField::Name => "name",
            BookField::Author => "author",
            BookField::Publish => "publish",
            BookField::Isbn => "isbn",
            BookField::Status => "status",
            BookField::Location => "location",
        }
    }

    /// Header and form label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            BookField::Name => "书名",
            BookField::Author => "作者",
            BookField::Publish => "出版年份",
            BookField::Isbn => "ISBN",
            BookField::Status => "状态",
            BookField::Location => "所在位置",
        }
    }

    /// Field shown in a given grid column, if that column is editable.
    pub fn from_grid_column(column: usize) -> Option<Self> {
        column
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Grid column index of this field (the id occupies column 0).
    pub fn grid_column(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .map_or(0, |idx| idx + 1)
    }
}

/// What clicking the action cell does for a given status. Only the two
/// conventional statuses have an action; anything else maps to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAction {
    /// Offered while the book is in stock.
    CheckOut,
    /// Offered while the book is lent out.
    Return,
}

impl LoanAction {
    /// Exact-match lookup; no trimming or case folding.
    pub fn for_status(status: &str) -> Option<Self> {
        match status {
            STATUS_IN_STOCK => Some(LoanAction::CheckOut),
            STATUS_CHECKED_OUT => Some(LoanAction::Return),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanAction::CheckOut => "借出",
            LoanAction::Return => "归还",
        }
    }

    /// Status the record moves to once the action is applied.
    pub fn next_status(self) -> &'static str {
        match self {
            LoanAction::CheckOut => STATUS_CHECKED_OUT,
            LoanAction::Return => STATUS_IN_STOCK,
        }
    }
}

/// Label for the action cell of a record with `status`; empty when the status
/// has no mapped action.
pub fn action_label(status: &str) -> &'static str {
    LoanAction::for_status(status).map_or("", LoanAction::label)
}
