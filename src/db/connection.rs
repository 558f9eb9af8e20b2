use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".book-inventory";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "books.db";

/// Open (creating if needed) the SQLite file at `path` and make sure the
/// `books` table exists. Every statement afterwards runs in autocommit mode,
/// so each insert, update, or delete is durable as soon as it returns.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `books` table if it is absent. `publish` keeps the `DATE`
/// declared type, so SQLite may store a bare year as an integer; readers go
/// through `text_at` to get it back as text.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            author TEXT,
            publish DATE,
            isbn TEXT,
            status TEXT,
            location TEXT
        )",
        [],
    )
    .context("failed to create books table")?;
    Ok(())
}

/// Application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Default location of the SQLite file when the config does not override it.
pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE_NAME))
}
