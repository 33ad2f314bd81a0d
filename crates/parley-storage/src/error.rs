use thiserror::Error;

/// Errors surfaced by a document store client.
///
/// Callers above the store propagate these unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached: connectivity loss, a locked or missing
    /// database file, or an operation timeout.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation: malformed query, invalid document,
    /// constraint violation.
    #[error("document store rejected operation: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, StoreError::Rejected(_))
    }
}

// Primary SQLite result codes that mean "could not reach the data" rather than
// "the request was wrong".
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_IOERR: i32 = 10;
const SQLITE_CANTOPEN: i32 = 14;
const SQLITE_PROTOCOL: i32 = 15;

impl From<libsql::Error> for StoreError {
    fn from(err: libsql::Error) -> Self {
        match err {
            libsql::Error::ConnectionFailed(reason) => StoreError::Unavailable(reason),
            libsql::Error::SqliteFailure(code, reason) => match code & 0xff {
                SQLITE_BUSY | SQLITE_LOCKED | SQLITE_IOERR | SQLITE_CANTOPEN
                | SQLITE_PROTOCOL => StoreError::Unavailable(reason),
                _ => StoreError::Rejected(reason),
            },
            other => StoreError::Rejected(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Rejected(format!("invalid document: {}", err))
    }
}
