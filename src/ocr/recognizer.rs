//! Abstraction over the engine that turns an image into text

use anyhow::Result;
use async_trait::async_trait;

/// Anything that can read the text off a lab-report image.
///
/// The HTTP layer only depends on this trait, so the Tesseract-backed
/// [`OcrService`](super::OcrService) can be swapped for a fixed-text stub in
/// tests or for another engine.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in an encoded PNG or JPEG image
    async fn recognize(&self, image: &[u8]) -> Result<String>;

    /// Human-readable engine name, reported by the health endpoint
    fn engine_name(&self) -> &'static str;

    /// Whether the engine can actually run in this build/environment
    fn is_available(&self) -> bool {
        true
    }
}

/// Recognizer that always returns the same text. Handy for tests and for
/// running the parser over text that was recognized elsewhere.
#[derive(Debug, Clone)]
pub struct StaticTextRecognizer {
    text: String,
}

impl StaticTextRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextRecognizer for StaticTextRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<String> {
        Ok(self.text.clone())
    }

    fn engine_name(&self) -> &'static str {
        "static"
    }
}
