use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The labeled fields an inspection report photo can carry.
///
/// These are the exact labels printed on the test report; OCR output is
/// matched against them after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldLabel {
    TestId,
    Evin,
    UserVin,
    LicensePlate,
    TestType,
    Protocol,
    TestResult,
    TestDateTime,
}

impl FieldLabel {
    /// All known labels, in report order.
    pub const ALL: [FieldLabel; 8] = [
        FieldLabel::TestId,
        FieldLabel::Evin,
        FieldLabel::UserVin,
        FieldLabel::LicensePlate,
        FieldLabel::TestType,
        FieldLabel::Protocol,
        FieldLabel::TestResult,
        FieldLabel::TestDateTime,
    ];

    /// The label as printed on the report.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldLabel::TestId => "Test ID",
            FieldLabel::Evin => "eVIN",
            FieldLabel::UserVin => "User VIN",
            FieldLabel::LicensePlate => "License Plate",
            FieldLabel::TestType => "Test Type",
            FieldLabel::Protocol => "Protocol",
            FieldLabel::TestResult => "Test Result",
            FieldLabel::TestDateTime => "Test Date/Time",
        }
    }

    /// Look up a label from its normalized form (lowercase, single spaces).
    pub fn from_normalized(label: &str) -> Option<FieldLabel> {
        match label {
            "test id" => Some(FieldLabel::TestId),
            "evin" => Some(FieldLabel::Evin),
            "user vin" => Some(FieldLabel::UserVin),
            "license plate" => Some(FieldLabel::LicensePlate),
            "test type" => Some(FieldLabel::TestType),
            "protocol" => Some(FieldLabel::Protocol),
            "test result" => Some(FieldLabel::TestResult),
            "test date/time" => Some(FieldLabel::TestDateTime),
            _ => None,
        }
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One OCR pass's labeled fields. Absent fields are empty strings; an empty
/// VIN field means "no candidate" downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrFieldSet {
    fields: HashMap<FieldLabel, String>,
}

impl OcrFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: FieldLabel) -> &str {
        self.fields.get(&label).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, label: FieldLabel, value: impl Into<String>) {
        self.fields.insert(label, value.into());
    }

    /// Trim every stored value in place. Called once at the end of a parse.
    pub fn trim_values(&mut self) {
        for value in self.fields.values_mut() {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }
    }
}

/// Raw decode-authority answer for one VIN, reduced to the fields the
/// pipeline consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodedVin {
    pub error_code: Option<String>,
    pub error_text: Option<String>,
    pub make: Option<String>,
    pub model_year: Option<String>,
}

impl DecodedVin {
    /// A VIN is valid iff the authority's error code is exactly `"0"` or a
    /// multi-code list whose first entry is `"0"` (rendered as `"0,..."`).
    /// A missing code means invalid.
    pub fn is_valid(&self) -> bool {
        match self.error_code.as_deref() {
            Some(code) => code == "0" || code.starts_with("0,"),
            None => false,
        }
    }
}

/// Outcome of classifying one candidate VIN. Every failure path resolves to
/// this record; the validator never raises past its boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VinValidation {
    pub is_valid: bool,
    pub error_reason: Option<String>,
    pub make: Option<String>,
    pub model_year: Option<String>,
}

impl VinValidation {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_reason: Some(reason.into()),
            make: None,
            model_year: None,
        }
    }
}

/// One vehicle's extracted record, one per uploaded image, in upload order.
///
/// Fields stay public and plain so the operator UI can patch individual
/// values without re-running the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Reference to the source image (path or upload id).
    pub source_image: String,
    pub vin: String,
    pub license_plate: String,
    pub make: String,
    pub model_year: String,
    /// True when the enrichment lookup failed at the transport level. An
    /// authority that answered "invalid" leaves this false.
    pub lookup_failed: bool,
}

/// A historical client row from the receipt sheet, used for autocomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub company: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub account_email: String,
    #[serde(default)]
    pub address: String,
}

/// Per-vehicle row persisted with a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub vin: String,
    pub license_plate: String,
    pub make: String,
    pub model_year: String,
}

impl From<&VehicleRecord> for VehicleSummary {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            vin: record.vin.clone(),
            license_plate: record.license_plate.clone(),
            make: record.make.clone(),
            model_year: record.model_year.clone(),
        }
    }
}

/// The receipt payload appended to the sheet store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub id: Uuid,
    /// Receipt date, `YYYY-MM-DD`.
    pub date: String,
    pub total_charge: String,
    pub company: String,
    pub name: String,
    pub phone: String,
    pub client_email: String,
    pub address: String,
    pub additional_service: String,
    pub vehicles: Vec<VehicleSummary>,
}

impl ReceiptData {
    /// Start a receipt dated today with the given vehicles.
    pub fn new(vehicles: Vec<VehicleSummary>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            total_charge: String::new(),
            company: String::new(),
            name: String::new(),
            phone: String::new(),
            client_email: String::new(),
            address: String::new(),
            additional_service: String::new(),
            vehicles,
        }
    }
}
