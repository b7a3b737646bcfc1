use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Rejected workout input. The ledger is never touched when this is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serializing workouts: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid workout: {0}")]
    Validation(#[from] ValidationError),
    #[error("no workout is being edited")]
    NotEditing,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for LedgerError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::from(value).into()
    }
}
