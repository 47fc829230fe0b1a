//! NHTSA vPIC decode authority client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vinforge_core::{DecodedVin, VinAuthority, VinForgeError};

const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Client for the vPIC `DecodeVinValuesExtended` endpoint.
pub struct VpicClient {
    client: Client,
    base_url: String,
}

impl VpicClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for VpicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct VpicResponse {
    #[serde(rename = "Results", default)]
    results: Vec<VpicResult>,
}

#[derive(Deserialize)]
struct VpicResult {
    #[serde(rename = "ErrorCode")]
    error_code: Option<String>,
    #[serde(rename = "ErrorText")]
    error_text: Option<String>,
    #[serde(rename = "Make")]
    make: Option<String>,
    #[serde(rename = "ModelYear")]
    model_year: Option<String>,
}

impl From<VpicResult> for DecodedVin {
    fn from(result: VpicResult) -> Self {
        DecodedVin {
            error_code: non_empty(result.error_code),
            error_text: non_empty(result.error_text),
            make: non_empty(result.make),
            model_year: non_empty(result.model_year),
        }
    }
}

/// vPIC renders absent fields as empty strings rather than nulls.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl VinAuthority for VpicClient {
    fn name(&self) -> &str {
        "nhtsa-vpic"
    }

    async fn decode(&self, vin: &str) -> Result<Option<DecodedVin>, VinForgeError> {
        let url = format!("{}/DecodeVinValuesExtended/{}?format=json", self.base_url, vin);
        debug!(vin = %vin, "Sending decode request to vPIC");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| VinForgeError::DecodeTransport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VinForgeError::DecodeStatus {
                status: status.as_u16(),
            });
        }

        let payload: VpicResponse = response
            .json()
            .await
            .map_err(|err| VinForgeError::DecodeTransport(err.to_string()))?;

        Ok(payload.results.into_iter().next().map(DecodedVin::from))
    }
}
