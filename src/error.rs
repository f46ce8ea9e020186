use thiserror::Error;

#[derive(Error, Debug)]
pub enum VbmsError {
    #[error("Not in a vbms workspace. Run 'vbms init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .vbms/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Duplicate display id: {0}")]
    DuplicateId(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, VbmsError>;
