pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    /// Path data that cannot be tokenized or draws without a current point.
    #[error("malformed path data: {0}")]
    MalformedPath(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("document error: {0}")]
    Document(String),
}

impl ConvertError {
    pub fn malformed_path(msg: impl Into<String>) -> Self {
        Self::MalformedPath(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }
}
