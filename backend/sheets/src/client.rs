//! Client for the spreadsheet-backed receipt store.
//!
//! The store is an Apps-Script-style web app over one sheet: a POST appends
//! a receipt row, and `?action=searchClients` searches historical rows by
//! substring for the autocomplete fields. The deployed endpoint handles GET
//! more reliably than POST, so search goes GET-first with a POST fallback.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vinforge_core::{ClientRecord, ReceiptData, VinForgeError};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub struct SheetsClient {
    client: Client,
    webapp_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    clients: Vec<ClientRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    action: &'static str,
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
}

impl SheetsClient {
    pub fn new(webapp_url: impl Into<String>) -> Self {
        Self::with_timeout(webapp_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(webapp_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            webapp_url: webapp_url.into(),
        }
    }

    /// Search historical client rows by substring across the client fields.
    pub async fn search_clients(&self, term: &str) -> Result<Vec<ClientRecord>, VinForgeError> {
        match self.search_via_get(term).await {
            Ok(clients) => Ok(clients),
            Err(err) => {
                warn!(error = %err, "GET client search failed, falling back to POST");
                self.search_via_post(term).await
            }
        }
    }

    async fn search_via_get(&self, term: &str) -> Result<Vec<ClientRecord>, VinForgeError> {
        let url = format!(
            "{}?action=searchClients&searchTerm={}",
            self.webapp_url,
            urlencoding::encode(term)
        );
        debug!(term = %term, "Searching clients via GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| VinForgeError::SheetStore(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VinForgeError::SheetStore(format!(
                "search returned status {status}"
            )));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|err| VinForgeError::SheetStore(err.to_string()))?;
        Self::unpack_search(payload)
    }

    async fn search_via_post(&self, term: &str) -> Result<Vec<ClientRecord>, VinForgeError> {
        let body = SearchRequest {
            action: "searchClients",
            search_term: term,
        };
        let response = self
            .client
            .post(&self.webapp_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| VinForgeError::SheetStore(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VinForgeError::SheetStore(format!(
                "search returned status {status}"
            )));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|err| VinForgeError::SheetStore(err.to_string()))?;
        Self::unpack_search(payload)
    }

    fn unpack_search(payload: SearchResponse) -> Result<Vec<ClientRecord>, VinForgeError> {
        if payload.success {
            Ok(payload.clients)
        } else {
            Err(VinForgeError::SheetStore(
                payload
                    .error
                    .unwrap_or_else(|| "search was not successful".to_string()),
            ))
        }
    }

    /// Append one receipt row to the sheet.
    pub async fn append_receipt(&self, receipt: &ReceiptData) -> Result<(), VinForgeError> {
        debug!(receipt_id = %receipt.id, vehicles = receipt.vehicles.len(), "Appending receipt row");

        let response = self
            .client
            .post(&self.webapp_url)
            .json(receipt)
            .send()
            .await
            .map_err(|err| VinForgeError::SheetStore(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VinForgeError::SheetStore(format!(
                "append returned status {status}"
            )));
        }

        let payload: SaveResponse = response
            .json()
            .await
            .map_err(|err| VinForgeError::SheetStore(err.to_string()))?;

        if payload.success {
            Ok(())
        } else {
            Err(VinForgeError::SheetStore(
                payload
                    .error
                    .unwrap_or_else(|| "append was not successful".to_string()),
            ))
        }
    }
}
