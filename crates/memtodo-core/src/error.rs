use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemtodoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, MemtodoError>;
