use thiserror::Error;

/// Top-level error type for the VinForge backend.
#[derive(Debug, Error)]
pub enum VinForgeError {
    /// The OCR engine could not produce text for an image. Fatal for the
    /// whole batch it occurred in.
    #[error("OCR extraction failed: {0}")]
    OcrFailed(String),

    /// The decode authority answered with a non-success HTTP status.
    #[error("VIN decode API returned status {status}")]
    DecodeStatus { status: u16 },

    /// The decode authority could not be reached at all.
    #[error("VIN decode transport error: {0}")]
    DecodeTransport(String),

    #[error("sheet store error: {0}")]
    SheetStore(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
