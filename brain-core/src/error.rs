use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrainError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("lock {} not acquired after {attempts} attempts", path.display())]
    LockContention { path: PathBuf, attempts: u32 },

    #[error("corrupt line {line} in {}: {text:?}", path.display())]
    Corruption {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BrainError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, BrainError>;
