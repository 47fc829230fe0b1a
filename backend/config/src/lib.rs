//! VinForge runtime configuration.
//!
//! Everything is environment-driven with sensible defaults; there is no
//! config file. `VINFORGE_*` variables override, `RUST_LOG` controls the
//! log level as usual.

use serde::Deserialize;

use vinforge_core::VinForgeError;

/// VinForge runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Base URL of the NHTSA vPIC API
    pub vpic_base_url: String,
    /// Decode request timeout in seconds
    pub decode_timeout_secs: u64,
    /// Apps-Script web-app URL of the receipt sheet (search and append are
    /// unavailable without it)
    pub sheets_webapp_url: Option<String>,
    /// Sheet request timeout in seconds
    pub sheets_timeout_secs: u64,
    /// Tesseract binary to invoke for OCR
    pub tesseract_binary: String,
    /// OCR language pack
    pub tesseract_lang: String,
    /// OCR per-image timeout in seconds
    pub ocr_timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// Directory for rolling NDJSON log files (console-only when unset)
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8090,
            vpic_base_url: "https://vpic.nhtsa.dot.gov/api/vehicles".to_string(),
            decode_timeout_secs: 15,
            sheets_webapp_url: None,
            sheets_timeout_secs: 20,
            tesseract_binary: "tesseract".to_string(),
            tesseract_lang: "eng".to_string(),
            ocr_timeout_secs: 60,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            bind_address: std::env::var("VINFORGE_BIND").unwrap_or(defaults.bind_address),
            port: std::env::var("VINFORGE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            vpic_base_url: std::env::var("VINFORGE_VPIC_URL").unwrap_or(defaults.vpic_base_url),
            decode_timeout_secs: std::env::var("VINFORGE_DECODE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.decode_timeout_secs),
            sheets_webapp_url: std::env::var("VINFORGE_SHEETS_URL").ok(),
            sheets_timeout_secs: std::env::var("VINFORGE_SHEETS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sheets_timeout_secs),
            tesseract_binary: std::env::var("VINFORGE_TESSERACT_BIN")
                .unwrap_or(defaults.tesseract_binary),
            tesseract_lang: std::env::var("VINFORGE_TESSERACT_LANG")
                .unwrap_or(defaults.tesseract_lang),
            ocr_timeout_secs: std::env::var("VINFORGE_OCR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ocr_timeout_secs),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: std::env::var("VINFORGE_LOG_DIR").ok(),
        }
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), VinForgeError> {
        if self.vpic_base_url.is_empty() {
            return Err(VinForgeError::ConfigError(
                "vpic_base_url must not be empty".to_string(),
            ));
        }
        if self.decode_timeout_secs == 0 || self.ocr_timeout_secs == 0 {
            return Err(VinForgeError::ConfigError(
                "timeouts must be non-zero".to_string(),
            ));
        }
        if let Some(url) = &self.sheets_webapp_url {
            if url.is_empty() {
                return Err(VinForgeError::ConfigError(
                    "VINFORGE_SHEETS_URL is set but empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
