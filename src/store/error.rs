use thiserror::Error;

/// Errors surfaced by the rule store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database query failed: {0}")]
    Query(String),

    #[error("database lock poisoned: {0}")]
    Lock(String),

    #[error("unusable {field} value in storage: '{value}'")]
    FieldValue { field: &'static str, value: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
