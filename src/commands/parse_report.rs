use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

use crate::models::ApiResponse;
use crate::ocr::{error::OcrError, OcrConfig, OcrService};
use crate::parsing::LabReportParser;
use crate::utils::ocr::{file_is_supported_image, resolve_content_type};

/// Run the parser over text that was already recognized elsewhere.
///
/// # Arguments
/// * `path` - UTF-8 text file holding the OCR output of one report
/// * `parser` - Parser to use (default patterns plus any configured extras)
///
/// # Returns
/// The success envelope; a text file always parses, possibly to zero records
pub fn parse_text_file(path: &Path, parser: &LabReportParser) -> Result<ApiResponse> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read text file {}", path.display()))?;

    let records = parser.parse(&text);
    info!("Parsed {} tests from {}", records.len(), path.display());
    Ok(ApiResponse::success(records))
}

/// Recognize an image with Tesseract, then parse the text.
///
/// Mirrors the HTTP endpoint: a file without a PNG/JPEG extension is an
/// error, while recognition failures produce the failure envelope.
pub async fn parse_image_file(
    path: &Path,
    ocr_config: OcrConfig,
    parser: &LabReportParser,
) -> Result<ApiResponse> {
    let filename = path.to_string_lossy();
    if !file_is_supported_image(&filename) {
        let content_type = resolve_content_type(None, Some(&filename))
            .unwrap_or_else(|| "unknown".to_string());
        return Err(OcrError::UnsupportedMediaType { content_type }.into());
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    let service = OcrService::new_with_config(ocr_config);
    match service.extract_text_from_image_bytes(&bytes).await {
        Ok(text) => {
            let records = parser.parse(&text);
            info!("Extracted {} potential tests from {}", records.len(), path.display());
            Ok(ApiResponse::success(records))
        }
        Err(e) => {
            error!("Error processing {}: {:#}", path.display(), e);
            Ok(ApiResponse::failure())
        }
    }
}

pub fn render_json(response: &ApiResponse, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(json)
}
