pub mod models;
pub mod reader;

use crate::error::{AppError, QueryError};

/// Map sqlx errors onto the snapshot-quality taxonomy. A file that is not
/// a SQLite database (or is half-written) reads as corrupt; a database
/// missing the expected table/columns or holding the wrong types reads as
/// a schema mismatch. Anything else stays a plain database error.
pub(crate) fn classify_sqlite_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) => {
            let msg = db.message().to_ascii_lowercase();
            if msg.contains("no such table") || msg.contains("no such column") {
                AppError::Query(QueryError::SchemaMismatch(db.message().to_string()))
            } else if msg.contains("not a database") || msg.contains("malformed") {
                AppError::Query(QueryError::Corrupt(db.message().to_string()))
            } else {
                AppError::Database(e)
            }
        }
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Query(QueryError::SchemaMismatch(format!("missing column {col}")))
        }
        sqlx::Error::ColumnDecode { index, .. } => AppError::Query(QueryError::SchemaMismatch(
            format!("unexpected type in column {index}"),
        )),
        _ => AppError::Database(e),
    }
}
