//! Vehicle record builder.
//!
//! Runs the full per-image pipeline (recognize, parse, reconcile) over an
//! ordered batch of uploaded document photos. Output order always matches
//! input order. An OCR failure on any image fails the whole batch; no
//! partial record list is delivered.

use serde::{Deserialize, Serialize};
use tracing::info;

use vinforge_core::{OcrEngine, VehicleRecord, VinAuthority, VinForgeError};
use vinforge_ocr::parse_fields;

use crate::reconcile::reconcile;

/// One image's recognized text, ready for parsing. The API also accepts
/// this form directly when the caller already ran OCR.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageText {
    pub image_ref: String,
    pub raw_text: String,
}

/// Build one record per image, recognizing text with the given engine.
pub async fn build_records(
    ocr: &dyn OcrEngine,
    authority: &dyn VinAuthority,
    images: &[String],
) -> Result<Vec<VehicleRecord>, VinForgeError> {
    // Recognize everything up front so an OCR failure aborts the batch
    // before any decode lookups are spent.
    let mut pages = Vec::with_capacity(images.len());
    for image in images {
        let raw_text = ocr.recognize(image).await?;
        pages.push(ImageText {
            image_ref: image.clone(),
            raw_text,
        });
    }
    Ok(build_records_from_text(authority, &pages).await)
}

/// Build one record per pre-recognized page. Infallible per batch: OCR has
/// already happened, and every per-VIN failure becomes data in the record.
pub async fn build_records_from_text(
    authority: &dyn VinAuthority,
    pages: &[ImageText],
) -> Vec<VehicleRecord> {
    let mut records = Vec::with_capacity(pages.len());
    for page in pages {
        let fields = parse_fields(&page.raw_text);
        let vehicle = reconcile(authority, &fields).await;
        info!(
            image = %page.image_ref,
            vin = %vehicle.vin,
            lookup_failed = vehicle.lookup_failed,
            "Built vehicle record"
        );
        records.push(VehicleRecord {
            source_image: page.image_ref.clone(),
            vin: vehicle.vin,
            license_plate: vehicle.license_plate,
            make: vehicle.make,
            model_year: vehicle.model_year,
            lookup_failed: vehicle.lookup_failed,
        });
    }
    records
}
