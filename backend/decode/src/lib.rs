//! VIN decoding for VinForge.
//!
//! Wraps the NHTSA vPIC decode service and classifies candidate VINs with
//! soft failure semantics.

pub mod nhtsa;
pub mod validity;

pub use nhtsa::VpicClient;
pub use validity::{check_vin_validity, MIN_VIN_LEN};
