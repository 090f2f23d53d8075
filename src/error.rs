use thiserror::Error;

#[derive(Error, Debug)]
pub enum RutideError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("无效的测试路径: {0}")]
    InvalidPath(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for RutideError {
    fn from(err: anyhow::Error) -> Self {
        RutideError::Other(err.to_string())
    }
}

// Add conversion from parser::ParseError
impl From<crate::parser::ParseError> for RutideError {
    fn from(err: crate::parser::ParseError) -> Self {
        RutideError::ParseError(err.to_string())
    }
}

/// Result type for rutide crate
pub type Result<T> = std::result::Result<T, RutideError>;
