//! Test doubles for the pipeline tests: a scripted decode authority and a
//! scripted OCR engine, both counting the calls they serve.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use vinforge_core::{DecodedVin, OcrEngine, VinAuthority, VinForgeError};

/// What the mock authority answers for one VIN.
pub enum Script {
    Valid { make: String, year: String },
    Invalid { text: String },
    NoData,
    Transport,
}

impl Script {
    pub fn valid(make: &str, year: &str) -> Self {
        Script::Valid {
            make: make.to_string(),
            year: year.to_string(),
        }
    }

    pub fn invalid(text: &str) -> Self {
        Script::Invalid {
            text: text.to_string(),
        }
    }

    pub fn transport() -> Self {
        Script::Transport
    }
}

pub struct MockAuthority {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, vin: &str, script: Script) -> Self {
        self.scripts.insert(vin.to_string(), script);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VinAuthority for MockAuthority {
    fn name(&self) -> &str {
        "mock-authority"
    }

    async fn decode(&self, vin: &str) -> Result<Option<DecodedVin>, VinForgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.scripts.get(vin) {
            Some(Script::Valid { make, year }) => Ok(Some(DecodedVin {
                error_code: Some("0".to_string()),
                error_text: None,
                make: Some(make.clone()),
                model_year: Some(year.clone()),
            })),
            Some(Script::Invalid { text }) => Ok(Some(DecodedVin {
                error_code: Some("6".to_string()),
                error_text: Some(text.clone()),
                make: None,
                model_year: None,
            })),
            Some(Script::Transport) => {
                Err(VinForgeError::DecodeTransport("connection reset".to_string()))
            }
            Some(Script::NoData) | None => Ok(None),
        }
    }
}

pub struct MockOcr {
    pages: HashMap<String, String>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl MockOcr {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_text(mut self, image: &str, text: &str) -> Self {
        self.pages.insert(image.to_string(), text.to_string());
        self
    }

    pub fn with_failure(mut self, image: &str) -> Self {
        self.failing.push(image.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock-ocr"
    }

    async fn recognize(&self, image_path: &str) -> Result<String, VinForgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|f| f == image_path) {
            return Err(VinForgeError::OcrFailed(format!(
                "scripted failure for {image_path}"
            )));
        }
        self.pages
            .get(image_path)
            .cloned()
            .ok_or_else(|| VinForgeError::OcrFailed(format!("no scripted text for {image_path}")))
    }
}
