//! The VIN extraction pipeline: reconciliation and per-image record
//! building. Everything here is stateless between calls; collaborators are
//! borrowed for the duration of one invocation.

pub mod builder;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{build_records, build_records_from_text, ImageText};
pub use reconcile::{reconcile, ReconciledVehicle};
