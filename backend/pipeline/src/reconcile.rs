//! VIN reconciliation.
//!
//! Given the labeled fields of one report photo, picks the single VIN the
//! record will carry and enriches it with make and model year. A report can
//! carry two independently labeled VIN readings (the machine-read `eVIN`
//! and the operator-keyed `User VIN`); when they disagree, both are checked
//! against the decode authority and the valid one wins. eVIN is the
//! documented default whenever validity doesn't break the tie.

use tracing::{debug, warn};

use vinforge_core::{FieldLabel, OcrFieldSet, VinAuthority};
use vinforge_decode::{check_vin_validity, MIN_VIN_LEN};

/// The reconciler's output for one report photo.
#[derive(Debug, Clone, Default)]
pub struct ReconciledVehicle {
    pub vin: String,
    pub license_plate: String,
    pub make: String,
    pub model_year: String,
    /// True when the enrichment lookup failed at the transport level. A
    /// negative answer from the authority leaves this false.
    pub lookup_failed: bool,
}

/// Reconcile one field set into a vehicle result.
///
/// Deterministic for fixed inputs and authority answers: when both
/// candidates are checked, both checks are awaited before the choice is
/// made, so completion order cannot change the outcome.
pub async fn reconcile(authority: &dyn VinAuthority, fields: &OcrFieldSet) -> ReconciledVehicle {
    let evin = fields.get(FieldLabel::Evin);
    let user_vin = fields.get(FieldLabel::UserVin);

    let vin = choose_vin(authority, evin, user_vin).await;

    let mut result = ReconciledVehicle {
        license_plate: fields.get(FieldLabel::LicensePlate).to_string(),
        ..ReconciledVehicle::default()
    };

    // One enrichment lookup for the chosen VIN. Candidates too short to
    // decode are skipped outright, same as the validity check would.
    if vin.len() >= MIN_VIN_LEN {
        match authority.decode(&vin).await {
            Ok(Some(decoded)) if decoded.is_valid() => {
                result.make = decoded.make.unwrap_or_default();
                result.model_year = decoded.model_year.unwrap_or_default();
            }
            Ok(_) => {
                // The authority answered, just negatively; the record keeps
                // the VIN as the current best guess.
                debug!(vin = %vin, "Enrichment lookup returned no clean decode");
            }
            Err(err) => {
                warn!(vin = %vin, error = %err, "Enrichment lookup failed");
                result.lookup_failed = true;
            }
        }
    }

    result.vin = vin;
    result
}

/// The candidate decision table.
async fn choose_vin(authority: &dyn VinAuthority, evin: &str, user_vin: &str) -> String {
    match (evin.is_empty(), user_vin.is_empty()) {
        (true, true) => String::new(),
        (false, true) => evin.to_string(),
        (true, false) => user_vin.to_string(),
        (false, false) if evin == user_vin => evin.to_string(),
        (false, false) => {
            let (evin_check, user_check) = tokio::join!(
                check_vin_validity(authority, evin),
                check_vin_validity(authority, user_vin)
            );
            if user_check.is_valid && !evin_check.is_valid {
                user_vin.to_string()
            } else {
                // eVIN wins every other combination. When neither candidate
                // validates it is still the default; the failure stays
                // visible through the chosen VIN's own validity check.
                if !evin_check.is_valid {
                    warn!(evin = %evin, user_vin = %user_vin, "Both VIN candidates failed validation, defaulting to eVIN");
                }
                evin.to_string()
            }
        }
    }
}
