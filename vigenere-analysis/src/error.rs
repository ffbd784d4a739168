//! Error types for cryptanalysis operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid key (must contain at least one letter)")]
    InvalidKey,

    #[error("Invalid key character: {0:?}")]
    InvalidKeyCharacter(char),

    #[error("Invalid key length {length} (must be between 1 and {max})")]
    InvalidKeyLength { length: usize, max: usize },

    #[error("Invalid result limit (must be > 0)")]
    InvalidResultLimit,

    #[error("Invalid key length range {min}..={max}")]
    InvalidRange { min: usize, max: usize },

    #[error("Empty input (text must contain at least one letter)")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
