use thiserror::Error;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, NnError>;

#[derive(Error, Debug)]
pub enum NnError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),

    /// A saved array or layer list does not fit the network being rebuilt.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Malformed dataset bytes (bad IDX header, truncated payload, ...).
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NnError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        NnError::ShapeMismatch { context: context.into(), expected, actual }
    }
}
