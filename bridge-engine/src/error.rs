use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Engine capability not available: {0}")]
    NotAvailable(String),

    #[error("Failed to resolve source: {0}")]
    ResolveFailed(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Engine reported transport status outside the supported set: {0}")]
    InvalidTransportStatus(String),

    #[error("Engine operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
