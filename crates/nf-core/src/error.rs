use thiserror::Error;

#[derive(Error, Debug)]
pub enum NfError {
    #[error("folder not found: {0}")]
    FolderNotFound(i64),

    #[error("note not found: {0}")]
    NoteNotFound(i64),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type NfResult<T> = Result<T, NfError>;
