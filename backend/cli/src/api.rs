use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use vinforge_core::{OcrEngine, ReceiptData, VinAuthority, VinValidation};
use vinforge_decode::check_vin_validity;
use vinforge_pipeline::{build_records, build_records_from_text, ImageText};
use vinforge_sheets::SheetsClient;

/// Shared application state for API handlers.
pub struct AppState {
    pub ocr: Arc<dyn OcrEngine>,
    pub authority: Arc<dyn VinAuthority>,
    /// Absent when no sheet web-app URL is configured.
    pub sheets: Option<SheetsClient>,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/receipts/extract", post(extract_batch))
        .route("/api/receipts", post(submit_receipt))
        .route("/api/clients", get(search_clients))
        .route("/api/vins/:vin", get(validate_vin))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "vinforge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Batch extraction request: either image paths for the server to OCR, or
/// pre-recognized pages when the caller ran OCR itself.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest {
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    pages: Vec<ImageText>,
}

/// Run the extraction pipeline over one upload batch.
///
/// Alongside the records, the response carries a validation per chosen VIN
/// so the UI can annotate a record whose VIN the authority rejected while
/// still showing it as the current best guess.
async fn extract_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<Value>, StatusCode> {
    let records = if !request.pages.is_empty() {
        build_records_from_text(state.authority.as_ref(), &request.pages).await
    } else {
        match build_records(
            state.ocr.as_ref(),
            state.authority.as_ref(),
            &request.images,
        )
        .await
        {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "Batch extraction failed");
                return Err(StatusCode::BAD_GATEWAY);
            }
        }
    };

    let mut validations: HashMap<String, VinValidation> = HashMap::new();
    for record in &records {
        if !record.vin.is_empty() && !validations.contains_key(&record.vin) {
            let validation = check_vin_validity(state.authority.as_ref(), &record.vin).await;
            validations.insert(record.vin.clone(), validation);
        }
    }

    Ok(Json(json!({
        "records": records,
        "validations": validations,
    })))
}

/// Re-check one VIN, e.g. after the operator edits the field.
async fn validate_vin(
    State(state): State<Arc<AppState>>,
    Path(vin): Path<String>,
) -> Json<Value> {
    let validation = check_vin_validity(state.authority.as_ref(), &vin).await;
    Json(json!({ "vin": vin, "validation": validation }))
}

#[derive(Deserialize)]
struct SearchParams {
    search: String,
}

/// Autocomplete search over historical client rows.
async fn search_clients(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, StatusCode> {
    let Some(sheets) = &state.sheets else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    match sheets.search_clients(&params.search).await {
        Ok(clients) => Ok(Json(json!({ "clients": clients }))),
        Err(err) => {
            error!(error = %err, "Client search failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Append a confirmed receipt to the sheet store.
async fn submit_receipt(
    State(state): State<Arc<AppState>>,
    Json(receipt): Json<ReceiptData>,
) -> Result<Json<Value>, StatusCode> {
    let Some(sheets) = &state.sheets else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    match sheets.append_receipt(&receipt).await {
        Ok(()) => Ok(Json(json!({ "saved": true, "id": receipt.id }))),
        Err(err) => {
            error!(error = %err, receipt_id = %receipt.id, "Receipt append failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
