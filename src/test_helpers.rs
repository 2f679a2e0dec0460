/*!
 * Test Helpers and Utilities
 *
 * Builders for test configurations, app state and routers with sensible
 * defaults. The recognizer is a fixed-text stub so route tests never need a
 * Tesseract installation.
 */

use axum::Router;
use std::sync::Arc;

use crate::{
    config::Config,
    ocr::{StaticTextRecognizer, TextRecognizer},
    routes::create_router,
    AppState,
};

/// Smallest valid PNG signature; enough for content sniffing
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Creates a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        max_upload_size_mb: 1,
        ..Config::default()
    }
}

/// Creates a test AppState whose recognizer always returns `ocr_text`
pub fn create_test_app_state(ocr_text: &str) -> Arc<AppState> {
    create_test_app_state_with_recognizer(
        create_test_config(),
        Arc::new(StaticTextRecognizer::new(ocr_text)),
    )
}

/// Creates a test AppState with a custom configuration and recognizer
pub fn create_test_app_state_with_recognizer(
    config: Config,
    recognizer: Arc<dyn TextRecognizer>,
) -> Arc<AppState> {
    Arc::new(AppState::new(config, recognizer).expect("test config should be valid"))
}

/// Router wired to a stub recognizer returning `ocr_text`
pub fn create_test_app(ocr_text: &str) -> Router {
    create_router(create_test_app_state(ocr_text))
}

/// Hand-built `multipart/form-data` body with a single file part.
/// Returns the `Content-Type` header value and the body bytes.
pub fn multipart_body(
    field_name: &str,
    filename: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> (String, Vec<u8>) {
    let boundary = "labreport-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_config() {
        let config = create_test_config();
        assert_eq!(config.server_address, "127.0.0.1:0");
        assert_eq!(config.max_upload_size_mb, 1);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_create_test_app_state() {
        let state = create_test_app_state("HEMOGLOBIN 14.5 g/dL 13.5-17.5");
        assert_eq!(state.recognizer.engine_name(), "static");
        assert_eq!(state.parser.parse("HEMOGLOBIN 14.5 g/dL 13.5-17.5").len(), 1);
    }

    #[test]
    fn test_multipart_body_layout() {
        let (content_type, body) = multipart_body("file", "a.png", Some("image/png"), b"xyz");
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("name=\"file\"; filename=\"a.png\""));
        assert!(text.contains("Content-Type: image/png"));
        assert!(text.trim_end().ends_with("--"));
    }
}
