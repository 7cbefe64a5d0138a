//! Database error types.

use thiserror::Error;
use vocab_core::StoreError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Sqlite(err) => StoreError::Backend(err.to_string()),
            DbError::Io(err) => StoreError::Unavailable(err.to_string()),
        }
    }
}
