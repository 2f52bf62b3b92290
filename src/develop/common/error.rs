use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevelopError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Allocation failed: {0}")]
    OutOfMemory(String),

    #[error("No preprocessed image to render")]
    NotPreprocessed,

    #[error("Failed to decode RAW data: {0}")]
    Decode(String),

    #[error("Unsupported sensor layout: {0}")]
    Unsupported(String),

    #[error("Failed to encode output image: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DevelopError>;
