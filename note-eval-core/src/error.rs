use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Input mismatch: {0}")]
    InputMismatch(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;

// Implement From for common error types
impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Serialization(err.to_string())
    }
}

impl From<std::str::Utf8Error> for EvalError {
    fn from(err: std::str::Utf8Error) -> Self {
        EvalError::Encoding(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for EvalError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EvalError::Encoding(err.to_string())
    }
}
