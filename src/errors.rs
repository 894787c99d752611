use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaatError {
    #[error("Transaction conflict detected")]
    TransactionConflict,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MaatError>;
