//! OCR engine adapter.
//!
//! Bridges the external `tesseract` binary behind the [`OcrEngine`] trait so
//! the pipeline can recognize document photos without caring which engine
//! is installed.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use vinforge_core::{OcrEngine, VinForgeError};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const STDERR_TAIL_CHARS: usize = 400;

/// Runs the Tesseract CLI against one image and captures its stdout.
pub struct TesseractEngine {
    binary: String,
    language: String,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: "eng".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &str) -> Result<String, VinForgeError> {
        info!(image = %image_path, "Running OCR recognition");

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!(image = %image_path, error = %err, "Failed to spawn OCR process");
                return Err(VinForgeError::OcrFailed(format!(
                    "could not run {}: {}",
                    self.binary, err
                )));
            }
            Err(_) => {
                warn!(image = %image_path, "OCR process timed out");
                return Err(VinForgeError::OcrFailed(format!(
                    "{} timed out after {}s",
                    self.binary,
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .chars()
                .rev()
                .take(STDERR_TAIL_CHARS)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            warn!(image = %image_path, status = ?output.status.code(), "OCR process failed");
            return Err(VinForgeError::OcrFailed(format!(
                "{} exited with {:?}: {}",
                self.binary,
                output.status.code(),
                tail.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
