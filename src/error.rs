use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReqSyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Path validation failed: {0}")]
    PathValidation(String),

    #[error("Scanning failed: {0}")]
    Scan(String),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("Standard input closed while waiting for an answer")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReqSyncError>;
