use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("error executing SQL `{sql}`: {source}")]
    Statement {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("no row in {table} with id {id:?}")]
    NotFound { table: &'static str, id: Option<i64> },
    #[error("database schema version mismatch (found {found}, expected {expected}); please run with --reset option")]
    SchemaMismatch { found: i64, expected: i64 },
    #[error("connection registry lock poisoned")]
    Poisoned,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub(crate) fn statement(sql: &str, source: rusqlite::Error) -> Self {
        StorageError::Statement {
            sql: compact_sql(sql),
            source,
        }
    }
}

// Collapse multi-line statements so log lines stay on one line.
fn compact_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
