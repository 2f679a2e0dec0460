pub mod error;
pub mod recognizer;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::ocr::error::OcrError;
use crate::utils::ocr::detect_image_mime;
pub use recognizer::{StaticTextRecognizer, TextRecognizer};

#[cfg(feature = "ocr")]
use tesseract::Tesseract;

/// Configuration for the OCR service
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Tesseract language(s), e.g. "eng" or "eng+hin"
    pub language: String,
    /// Tesseract page segmentation mode; 6 treats the page as one uniform
    /// block of text, which suits tabular reports
    pub page_segmentation_mode: u8,
    /// Directory holding the `.traineddata` files, if not the system default
    pub tessdata_path: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            page_segmentation_mode: 6,
            tessdata_path: None,
        }
    }
}

pub struct OcrService {
    config: OcrConfig,
}

impl Default for OcrService {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrService {
    pub fn new() -> Self {
        Self {
            config: OcrConfig::default(),
        }
    }

    /// Create OCR service with configuration
    pub fn new_with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Decode the upload, convert it to grayscale and run Tesseract over it.
    pub async fn extract_text_from_image_bytes(&self, image_bytes: &[u8]) -> Result<String> {
        if image_bytes.is_empty() {
            return Err(anyhow!(OcrError::EmptyUpload));
        }

        match detect_image_mime(image_bytes) {
            Some(mime) => debug!("Detected {} upload ({} bytes)", mime, image_bytes.len()),
            None => {
                return Err(anyhow!(OcrError::InvalidImageFormat {
                    details: "content is not a PNG or JPEG image".to_string(),
                }));
            }
        }

        #[cfg(feature = "ocr")]
        {
            let bytes = image_bytes.to_vec();
            let config = self.config.clone();

            // Tesseract blocks; keep it off the async workers
            let text = tokio::task::spawn_blocking(move || {
                let grayscale = preprocess_image(&bytes)?;
                info!("Image preprocessing: converted to grayscale");
                run_tesseract(&grayscale, &config)
            })
            .await
            .map_err(|e| anyhow!("OCR task failed to complete: {}", e))??;

            if text.trim().is_empty() {
                warn!("OCR returned empty or whitespace-only text");
            } else {
                info!("OCR successful, extracted {} characters", text.len());
            }

            Ok(text)
        }

        #[cfg(not(feature = "ocr"))]
        {
            Err(anyhow!(OcrError::TesseractNotInstalled))
        }
    }
}

/// Load an encoded image and re-encode it as an 8-bit grayscale PNG.
#[cfg(feature = "ocr")]
pub fn preprocess_image(image_bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
    let image = image::load_from_memory(image_bytes).map_err(|e| OcrError::ImageDecodeFailed {
        details: e.to_string(),
    })?;

    let grayscale = image.grayscale();
    let mut encoded = Vec::new();
    grayscale
        .write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
        .map_err(|e| OcrError::ImageDecodeFailed {
            details: format!("Failed to re-encode grayscale image: {}", e),
        })?;

    Ok(encoded)
}

#[cfg(feature = "ocr")]
fn run_tesseract(png: &[u8], config: &OcrConfig) -> Result<String, OcrError> {
    debug!(
        "Running Tesseract with lang={} psm={}",
        config.language, config.page_segmentation_mode
    );

    let mut tesseract = Tesseract::new(config.tessdata_path.as_deref(), Some(&config.language))
        .map_err(|e| OcrError::InitializationFailed {
            details: e.to_string(),
        })?
        .set_variable(
            "tessedit_pageseg_mode",
            &config.page_segmentation_mode.to_string(),
        )
        .map_err(|e| OcrError::InitializationFailed {
            details: e.to_string(),
        })?
        .set_image_from_mem(png)
        .map_err(|e| OcrError::InvalidImageFormat {
            details: e.to_string(),
        })?;

    tesseract.get_text().map_err(|e| OcrError::RecognitionFailed {
        details: format!("Failed to extract text: {}", e),
    })
}

#[async_trait]
impl TextRecognizer for OcrService {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        self.extract_text_from_image_bytes(image).await
    }

    fn engine_name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "ocr")
    }
}
