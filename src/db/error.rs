use thiserror::Error;

/// Failures raised while listing books. The split matters to the UI: a bad
/// user-typed fragment is shown inline and the grid keeps its rows, while any
/// other failure is reported like every other store error.
#[derive(Debug, Error)]
pub enum QueryError {
    /// SQLite refused the raw `WHERE` fragment typed into the query bar.
    #[error("invalid filter `{fragment}`: {source}")]
    InvalidFilter {
        fragment: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to load books: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl QueryError {
    /// Whether this error came from the user's filter text rather than the
    /// store itself.
    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, QueryError::InvalidFilter { .. })
    }
}
