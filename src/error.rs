//! Crate-wide error taxonomy.
//!
//! `NotFound` and `Decode` are recoverable and meant to be shown to the user.
//! `Encoding` means the in-memory image is unusable and is not retried.
//! Acquisition failures never show up here: the store swaps in a
//! placeholder image before they reach the caller.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Capture not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

/// Failure to turn a supplied payload into raster pixels.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unsupported or corrupt image data: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Whether the caller should present this as a user-facing message
    /// rather than an internal failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Decode(_))
    }
}
