use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error("unknown card {0}")]
    UnknownCard(String),
    #[error("ledger error: {0}")]
    Ledger(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[error("authorization engine is shut down")]
    EngineClosed,
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for AuthorizationError {
    fn from(err: rocksdb::Error) -> Self {
        AuthorizationError::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AuthorizationError>;
