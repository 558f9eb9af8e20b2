use anyhow::{anyhow, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use serde::Deserialize;
use tracing::{debug, info};

use super::error::QueryError;
use crate::models::{Book, BookField, NewBook};

/// Column list shared by every read so `book_from_row` can rely on positions.
const SELECT_BOOKS: &str = "SELECT id, name, author, publish, isbn, status, location FROM books";

/// How the text typed into the query bar is interpreted. One mode is active
/// per deployment, chosen in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// The text is a raw boolean SQL fragment placed after `WHERE`.
    Sql,
    /// The text is matched against id, name, author, location, and ISBN.
    #[default]
    Search,
}

impl FilterMode {
    /// Turn query-bar text into a filter. Blank text always means "all rows".
    pub fn filter_for(self, text: &str) -> BookFilter {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return BookFilter::All;
        }
        match self {
            FilterMode::Sql => BookFilter::Where(trimmed.to_string()),
            FilterMode::Search => BookFilter::Search(trimmed.to_string()),
        }
    }

    /// Whether the grid carries the borrow/return action column.
    pub fn has_loan_actions(self) -> bool {
        matches!(self, FilterMode::Search)
    }
}

/// A concrete listing request against the `books` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookFilter {
    #[default]
    All,
    /// Raw `WHERE` fragment. Trusted input: this is a single-user local tool
    /// and the fragment is pasted into the statement verbatim, so anything
    /// SQLite accepts as an expression is allowed.
    Where(String),
    /// Search text. Never reaches SQL; rows are matched in Rust.
    Search(String),
}

/// List books matching `filter`. A fragment SQLite rejects comes back as
/// [`QueryError::InvalidFilter`] so callers can keep their previous rows.
pub fn fetch_books(conn: &Connection, filter: &BookFilter) -> Result<Vec<Book>, QueryError> {
    match filter {
        BookFilter::All => Ok(collect_books(
            conn,
            &format!("{SELECT_BOOKS} ORDER BY id"),
            [],
        )?),
        BookFilter::Where(fragment) => {
            let sql = format!("{SELECT_BOOKS} WHERE {fragment}");
            collect_books(conn, &sql, []).map_err(|source| QueryError::InvalidFilter {
                fragment: fragment.clone(),
                source,
            })
        }
        BookFilter::Search(text) => {
            let needle = text.to_lowercase();
            let books = collect_books(conn, &format!("{SELECT_BOOKS} ORDER BY id"), [])?;
            Ok(books
                .into_iter()
                .filter(|book| search_hit(book, text, &needle))
                .collect())
        }
    }
}

/// Look up a single book by id.
pub fn fetch_book(conn: &Connection, id: i64) -> Result<Option<Book>> {
    let sql = format!("{SELECT_BOOKS} WHERE id = ?1");
    conn.query_row(&sql, params![id], book_from_row)
        .optional()
        .with_context(|| format!("failed to load book {id}"))
}

/// Insert a new book and return the row exactly as SQLite stored it, id
/// included, so the grid can append it without a reload.
pub fn create_book(conn: &Connection, book: &NewBook) -> Result<Book> {
    conn.execute(
        "INSERT INTO books (name, author, publish, isbn, status, location)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            book.name,
            book.author,
            book.publish,
            book.isbn,
            book.status,
            book.location
        ],
    )
    .context("failed to insert book")?;

    let id = conn.last_insert_rowid();
    let created = fetch_book(conn, id)?.ok_or_else(|| anyhow!("Book {id} missing after insert"))?;
    info!(id, name = %created.name, "created book");
    Ok(created)
}

/// Overwrite one field of an existing book. The value is always bound; only
/// the column name, drawn from [`BookField`], is formatted into the SQL.
pub fn update_book_field(conn: &Connection, id: i64, field: BookField, value: &str) -> Result<()> {
    let sql = format!("UPDATE books SET {} = ?1 WHERE id = ?2", field.column());
    let updated = conn
        .execute(&sql, params![value, id])
        .with_context(|| format!("failed to update {} of book {id}", field.column()))?;

    if updated == 0 {
        Err(anyhow!("Book {id} not found"))
    } else {
        info!(id, field = field.column(), value, "updated book field");
        Ok(())
    }
}

/// Delete a book by id. Deleting an id that no longer exists is a no-op and
/// reports `false`.
pub fn delete_book(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM books WHERE id = ?1", params![id])
        .with_context(|| format!("failed to delete book {id}"))?;

    if deleted == 0 {
        debug!(id, "delete skipped, book already gone");
        Ok(false)
    } else {
        info!(id, "deleted book");
        Ok(true)
    }
}

/// Exact id match, or a case-insensitive substring of name, author, location,
/// or ISBN. SQLite's `lower()` only folds ASCII, so folding happens here.
fn search_hit(book: &Book, text: &str, needle: &str) -> bool {
    book.id.to_string() == text
        || [&book.name, &book.author, &book.location, &book.isbn]
            .into_iter()
            .any(|value| value.to_lowercase().contains(needle))
}

fn collect_books<P: Params>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<Vec<Book>> {
    let mut stmt = conn.prepare(sql)?;
    let books = stmt
        .query_map(params, book_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        name: text_at(row, 1)?,
        author: text_at(row, 2)?,
        publish: text_at(row, 3)?,
        isbn: text_at(row, 4)?,
        status: text_at(row, 5)?,
        location: text_at(row, 6)?,
    })
}

/// Read any storage class as display text. Column affinity means a year typed
/// into `publish` may come back as an integer.
fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(value) | ValueRef::Blob(value) => String::from_utf8_lossy(value).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory database");
        ensure_schema(&conn).expect("schema");
        conn
    }

    fn new_book(name: &str, author: &str, isbn: &str, status: &str, location: &str) -> NewBook {
        NewBook {
            name: name.to_string(),
            author: author.to_string(),
            publish: "2001".to_string(),
            isbn: isbn.to_string(),
            status: status.to_string(),
            location: location.to_string(),
        }
    }

    #[test]
    fn create_returns_stored_row_with_fresh_id() -> Result<()> {
        let conn = memory_db();
        let first = create_book(&conn, &new_book("Dune", "Herbert", "978-0441", "在库", "A1"))?;
        let second = create_book(&conn, &NewBook::default())?;

        assert_ne!(first.id, second.id);
        assert_eq!(first.name, "Dune");
        assert_eq!(first.publish, "2001");
        assert_eq!(second.name, "");
        assert_eq!(second.location, "");

        let all = fetch_books(&conn, &BookFilter::All)?;
        assert_eq!(all, vec![first, second]);
        Ok(())
    }

    #[test]
    fn null_and_numeric_columns_read_back_as_text() -> Result<()> {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO books (name, publish, isbn) VALUES (NULL, 1999, 12.5)",
            [],
        )?;

        let books = fetch_books(&conn, &BookFilter::All)?;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "");
        assert_eq!(books[0].publish, "1999");
        assert_eq!(books[0].isbn, "12.5");
        Ok(())
    }

    #[test]
    fn update_touches_only_the_named_field() -> Result<()> {
        let conn = memory_db();
        let book = create_book(&conn, &new_book("Dune", "Herbert", "1", "在库", "A1"))?;

        update_book_field(&conn, book.id, BookField::Location, "B2")?;

        let reloaded = fetch_book(&conn, book.id)?.expect("book still present");
        assert_eq!(reloaded.location, "B2");
        assert_eq!(reloaded.name, book.name);
        assert_eq!(reloaded.status, book.status);
        Ok(())
    }

    #[test]
    fn update_binds_values_verbatim() -> Result<()> {
        let conn = memory_db();
        let book = create_book(&conn, &NewBook::default())?;
        let hostile = "x'; DROP TABLE books; --";

        update_book_field(&conn, book.id, BookField::Name, hostile)?;

        assert_eq!(fetch_book(&conn, book.id)?.expect("row").name, hostile);
        Ok(())
    }

    #[test]
    fn update_missing_book_is_an_error() {
        let conn = memory_db();
        let err = update_book_field(&conn, 42, BookField::Name, "x").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn delete_removes_one_row_and_ignores_missing_ids() -> Result<()> {
        let conn = memory_db();
        let keep = create_book(&conn, &new_book("Keep", "", "", "", ""))?;
        let gone = create_book(&conn, &new_book("Gone", "", "", "", ""))?;

        assert!(delete_book(&conn, gone.id)?);
        assert!(!delete_book(&conn, gone.id)?);

        let remaining = fetch_books(&conn, &BookFilter::All)?;
        assert_eq!(remaining, vec![keep]);
        Ok(())
    }

    #[test]
    fn sql_fragment_filters_rows() -> Result<()> {
        let conn = memory_db();
        create_book(&conn, &new_book("Dune", "Herbert", "", "在库", ""))?;
        create_book(&conn, &new_book("Emma", "Austen", "", "已借出", ""))?;

        let filter = FilterMode::Sql.filter_for("status = '已借出'");
        let books = fetch_books(&conn, &filter)?;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Emma");
        Ok(())
    }

    #[test]
    fn malformed_fragment_is_reported_as_invalid_filter() {
        let conn = memory_db();
        for fragment in ["name = ", "no_such_column = 1", "1; DELETE FROM books"] {
            let filter = FilterMode::Sql.filter_for(fragment);
            let err = fetch_books(&conn, &filter).unwrap_err();
            assert!(err.is_invalid_filter(), "{fragment} should be rejected");
        }
    }

    #[test]
    fn blank_text_means_all_rows_in_both_modes() {
        assert_eq!(FilterMode::Sql.filter_for("   "), BookFilter::All);
        assert_eq!(FilterMode::Search.filter_for(""), BookFilter::All);
        assert_eq!(
            FilterMode::Search.filter_for("  dune "),
            BookFilter::Search("dune".to_string())
        );
    }

    #[test]
    fn search_matches_substrings_case_insensitively() -> Result<()> {
        let conn = memory_db();
        let dune = create_book(&conn, &new_book("Dune", "Frank Herbert", "978-0441", "在库", "Shelf A"))?;
        let emma = create_book(&conn, &new_book("Emma", "Jane Austen", "978-0141", "在库", "Shelf B"))?;
        create_book(&conn, &new_book("Ulysses", "Joyce", "000", "在库", "Attic"))?;

        let by_author = fetch_books(&conn, &FilterMode::Search.filter_for("herb"))?;
        assert_eq!(by_author, vec![dune.clone()]);

        let by_location = fetch_books(&conn, &FilterMode::Search.filter_for("SHELF"))?;
        assert_eq!(by_location, vec![dune.clone(), emma.clone()]);

        let by_isbn = fetch_books(&conn, &FilterMode::Search.filter_for("0141"))?;
        assert_eq!(by_isbn, vec![emma]);

        let none = fetch_books(&conn, &FilterMode::Search.filter_for("zzz"))?;
        assert!(none.is_empty());
        Ok(())
    }

    #[test]
    fn search_folds_case_beyond_ascii() -> Result<()> {
        let conn = memory_db();
        let eloge = create_book(&conn, &new_book("Éloge de l'ombre", "Tanizaki", "", "在库", ""))?;
        let karamazov = create_book(&conn, &new_book("Братья Карамазовы", "ДОСТОЕВСКИЙ", "", "在库", "Ящик"))?;

        let hits = fetch_books(&conn, &FilterMode::Search.filter_for("éloge"))?;
        assert_eq!(hits, vec![eloge]);

        let hits = fetch_books(&conn, &FilterMode::Search.filter_for("достоевский"))?;
        assert_eq!(hits, vec![karamazov.clone()]);

        let hits = fetch_books(&conn, &FilterMode::Search.filter_for("ЯЩИК"))?;
        assert_eq!(hits, vec![karamazov]);
        Ok(())
    }

    #[test]
    fn search_matches_exact_id() -> Result<()> {
        let conn = memory_db();
        let first = create_book(&conn, &new_book("Alpha", "", "", "", ""))?;
        let second = create_book(&conn, &new_book("Beta", "", "", "", ""))?;

        let hits = fetch_books(&conn, &FilterMode::Search.filter_for(&second.id.to_string()))?;
        assert_eq!(hits, vec![second]);
        assert!(!hits.iter().any(|book| book.id == first.id));
        Ok(())
    }

    #[test]
    fn search_treats_sql_wildcards_literally() -> Result<()> {
        let conn = memory_db();
        create_book(&conn, &new_book("100% Rust", "", "", "", ""))?;
        create_book(&conn, &new_book("Plain", "", "", "", ""))?;

        let hits = fetch_books(&conn, &FilterMode::Search.filter_for("%"))?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100% Rust");
        Ok(())
    }
}
