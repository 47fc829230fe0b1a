pub mod error;
pub mod traits;
pub mod types;

pub use error::VinForgeError;
pub use traits::{OcrEngine, VinAuthority};
pub use types::{
    ClientRecord, DecodedVin, FieldLabel, OcrFieldSet, ReceiptData, VehicleRecord,
    VehicleSummary, VinValidation,
};
