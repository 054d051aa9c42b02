/// Error types shared across the application
///
/// Every variant's Display string is what the user sees in the status area,
/// so keep them short and human. All errors are `Clone` because they travel
/// inside iced messages.

use thiserror::Error;

/// Failures on the generation path (validation, response shape, transport)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Please enter a prompt describing the edit.")]
    EmptyPrompt,

    #[error("A generation is already in progress.")]
    Busy,

    #[error("The model returned no candidates.")]
    NoCandidates,

    #[error("The model responded without an image.")]
    NoImageInResponse,

    #[error("Generation failed: {0}")]
    Failed(String),
}

impl GenerationError {
    /// Errors raised before any request is sent
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyPrompt | Self::Busy)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Failed("the request timed out".to_string())
        } else {
            Self::Failed(err.to_string())
        }
    }
}

/// Rejected selection changes on the iteration store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown iteration: {0}")]
    UnknownIteration(String),

    #[error("no source image is loaded")]
    NoSource,
}

/// Failures while reading an upload or writing a download
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageIoError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("the selected file is empty")]
    Empty,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

impl From<std::io::Error> for ImageIoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
