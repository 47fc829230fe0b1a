//! VIN validity classification.
//!
//! Absorbs every failure mode of the decode lookup into a [`VinValidation`]
//! record; nothing here raises past the validator boundary.

use tracing::debug;

use vinforge_core::{VinAuthority, VinForgeError, VinValidation};

/// Candidates shorter than this are classified without a network call.
pub const MIN_VIN_LEN: usize = 8;

/// Classify one candidate VIN against the decode authority.
///
/// The VIN is passed through as-is; the authority owns interpretation.
pub async fn check_vin_validity(authority: &dyn VinAuthority, vin: &str) -> VinValidation {
    if vin.len() < MIN_VIN_LEN {
        debug!(vin = %vin, "VIN too short, skipping decode lookup");
        return VinValidation::invalid("VIN too short");
    }

    match authority.decode(vin).await {
        Ok(Some(decoded)) => {
            if decoded.is_valid() {
                VinValidation {
                    is_valid: true,
                    error_reason: None,
                    make: Some(decoded.make.unwrap_or_default()),
                    model_year: Some(decoded.model_year.unwrap_or_default()),
                }
            } else {
                VinValidation::invalid(
                    decoded
                        .error_text
                        .unwrap_or_else(|| "Unknown VIN error".to_string()),
                )
            }
        }
        Ok(None) => VinValidation::invalid("No data returned from VIN API"),
        Err(VinForgeError::DecodeStatus { status }) => {
            VinValidation::invalid(format!("API Error: {status}"))
        }
        Err(err) => {
            debug!(vin = %vin, error = %err, "Decode lookup failed");
            VinValidation::invalid("Network error checking VIN")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use vinforge_core::DecodedVin;

    use super::*;

    /// Scripted authority that counts how many lookups it served.
    struct ScriptedAuthority {
        outcome: fn() -> Result<Option<DecodedVin>, VinForgeError>,
        calls: AtomicUsize,
    }

    impl ScriptedAuthority {
        fn new(outcome: fn() -> Result<Option<DecodedVin>, VinForgeError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VinAuthority for ScriptedAuthority {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn decode(&self, _vin: &str) -> Result<Option<DecodedVin>, VinForgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn clean_decode() -> Result<Option<DecodedVin>, VinForgeError> {
        Ok(Some(DecodedVin {
            error_code: Some("0".into()),
            error_text: None,
            make: Some("FORD".into()),
            model_year: Some("2018".into()),
        }))
    }

    #[tokio::test]
    async fn short_vin_skips_the_authority() {
        let authority = ScriptedAuthority::new(clean_decode);
        let validation = check_vin_validity(&authority, "1FT").await;
        assert!(!validation.is_valid);
        assert_eq!(validation.error_reason.as_deref(), Some("VIN too short"));
        assert_eq!(authority.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_vin_skips_the_authority() {
        let authority = ScriptedAuthority::new(clean_decode);
        let validation = check_vin_validity(&authority, "").await;
        assert!(!validation.is_valid);
        assert_eq!(authority.call_count(), 0);
    }

    #[tokio::test]
    async fn clean_error_code_is_valid() {
        let authority = ScriptedAuthority::new(clean_decode);
        let validation = check_vin_validity(&authority, "1FTEX1EP7JKE00001").await;
        assert!(validation.is_valid);
        assert_eq!(validation.make.as_deref(), Some("FORD"));
        assert_eq!(validation.model_year.as_deref(), Some("2018"));
        assert_eq!(authority.call_count(), 1);
    }

    #[tokio::test]
    async fn multi_code_list_led_by_zero_is_valid() {
        let authority = ScriptedAuthority::new(|| {
            Ok(Some(DecodedVin {
                error_code: Some("0,6".into()),
                error_text: Some("0 - clean; 6 - incomplete".into()),
                make: Some("RAM".into()),
                model_year: Some("2021".into()),
            }))
        });
        let validation = check_vin_validity(&authority, "3C6UR5DL1MG000001").await;
        assert!(validation.is_valid);
    }

    #[tokio::test]
    async fn nonzero_code_carries_authority_error_text() {
        let authority = ScriptedAuthority::new(|| {
            Ok(Some(DecodedVin {
                error_code: Some("11".into()),
                error_text: Some("11 - Incorrect model year".into()),
                make: None,
                model_year: None,
            }))
        });
        let validation = check_vin_validity(&authority, "1FTEX1EP7JKE00001").await;
        assert!(!validation.is_valid);
        assert_eq!(
            validation.error_reason.as_deref(),
            Some("11 - Incorrect model year")
        );
    }

    #[tokio::test]
    async fn missing_code_falls_back_to_generic_reason() {
        let authority = ScriptedAuthority::new(|| Ok(Some(DecodedVin::default())));
        let validation = check_vin_validity(&authority, "1FTEX1EP7JKE00001").await;
        assert!(!validation.is_valid);
        assert_eq!(validation.error_reason.as_deref(), Some("Unknown VIN error"));
    }

    #[tokio::test]
    async fn empty_payload_is_a_soft_failure() {
        let authority = ScriptedAuthority::new(|| Ok(None));
        let validation = check_vin_validity(&authority, "1FTEX1EP7JKE00001").await;
        assert!(!validation.is_valid);
        assert_eq!(
            validation.error_reason.as_deref(),
            Some("No data returned from VIN API")
        );
    }

    #[tokio::test]
    async fn http_status_failure_is_reported_with_status() {
        let authority =
            ScriptedAuthority::new(|| Err(VinForgeError::DecodeStatus { status: 503 }));
        let validation = check_vin_validity(&authority, "1FTEX1EP7JKE00001").await;
        assert!(!validation.is_valid);
        assert_eq!(validation.error_reason.as_deref(), Some("API Error: 503"));
    }

    #[tokio::test]
    async fn transport_failure_is_reported_generically() {
        let authority = ScriptedAuthority::new(|| {
            Err(VinForgeError::DecodeTransport("connection refused".into()))
        });
        let validation = check_vin_validity(&authority, "1FTEX1EP7JKE00001").await;
        assert!(!validation.is_valid);
        assert_eq!(
            validation.error_reason.as_deref(),
            Some("Network error checking VIN")
        );
    }
}
