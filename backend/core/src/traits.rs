use async_trait::async_trait;

use crate::error::VinForgeError;
use crate::types::DecodedVin;

/// Trait for OCR engines that turn a document photo into raw text.
///
/// Implementations are external collaborators (Tesseract, a vision API);
/// the pipeline holds no state between calls.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name (e.g., "tesseract").
    fn name(&self) -> &str;

    /// Recognize all text in the image at `image_path`.
    ///
    /// A failure here is fatal for the batch the image belongs to.
    async fn recognize(&self, image_path: &str) -> Result<String, VinForgeError>;
}

/// Trait for the external VIN decode authority.
///
/// Each call is one fresh lookup; answers are never cached or reused.
#[async_trait]
pub trait VinAuthority: Send + Sync {
    /// Authority name (e.g., "nhtsa-vpic").
    fn name(&self) -> &str;

    /// Decode one VIN, passed as-is with no normalization.
    ///
    /// `Ok(None)` means the authority answered but returned no results
    /// payload. Transport and HTTP-status failures are `Err`; the validator
    /// absorbs them into a soft classification.
    async fn decode(&self, vin: &str) -> Result<Option<DecodedVin>, VinForgeError>;
}
