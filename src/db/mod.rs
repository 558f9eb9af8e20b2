//! Persistence layer around the embedded SQLite file: one `books` table and
//! the four statements the grid needs.

mod books;
mod connection;
mod error;

pub use books::{
    create_book, delete_book, fetch_book, fetch_books, update_book_field, BookFilter, FilterMode,
};
pub use connection::{data_dir, default_db_path, ensure_schema, open_database, DATA_DIR_NAME};
pub use error::QueryError;
