use thiserror::Error;

/// Failures on the image-to-text side of the pipeline.
///
/// The parsing engine never produces these; they only come from decoding the
/// upload or driving Tesseract.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("Invalid image format: {details}")]
    InvalidImageFormat { details: String },

    #[error("Failed to decode image: {details}")]
    ImageDecodeFailed { details: String },

    #[error("Tesseract is not available in this build. Enable the `ocr` feature and install Tesseract.")]
    TesseractNotInstalled,

    #[error("Tesseract initialization failed: {details}")]
    InitializationFailed { details: String },

    #[error("Text recognition failed: {details}")]
    RecognitionFailed { details: String },

    #[error("Empty upload")]
    EmptyUpload,
}

impl OcrError {
    /// Errors caused by what the client sent, as opposed to the server failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OcrError::UnsupportedMediaType { .. }
                | OcrError::InvalidImageFormat { .. }
                | OcrError::ImageDecodeFailed { .. }
                | OcrError::EmptyUpload
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(OcrError::EmptyUpload.is_client_error());
        assert!(OcrError::UnsupportedMediaType {
            content_type: "application/pdf".to_string()
        }
        .is_client_error());
        assert!(!OcrError::TesseractNotInstalled.is_client_error());
        assert!(!OcrError::RecognitionFailed {
            details: "boom".to_string()
        }
        .is_client_error());
    }
}
