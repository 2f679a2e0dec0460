use anyhow::{anyhow, Context, Result};
use std::env;
use tracing::info;

use crate::ocr::OcrConfig;
use crate::parsing::{LabReportParser, LineClassifier};

/// Separator between entries of `LABREPORT_EXTRA_IGNORE_PATTERNS`.
/// Regexes routinely contain `;` and `|`, so a doubled semicolon is used.
pub const IGNORE_PATTERN_SEPARATOR: &str = ";;";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub ocr: OcrConfig,
    pub max_upload_size_mb: u64,
    pub extra_ignore_patterns: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        match dotenvy::dotenv() {
            Ok(path) => info!("✅ Loaded environment variables from: {}", path.display()),
            Err(_) => info!("ℹ️  No .env file found, using system environment variables"),
        }

        let server_address = match env::var("SERVER_ADDRESS") {
            Ok(addr) => addr,
            Err(_) => {
                let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
                let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
                port.parse::<u16>()
                    .map_err(|_| anyhow!("PORT must be a valid port number, got '{}'", port))?;
                format!("{}:{}", host, port)
            }
        };

        let language = env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string());
        validate_ocr_language(&language)?;

        let page_segmentation_mode = match env::var("OCR_PAGE_SEGMENTATION_MODE") {
            Ok(raw) => {
                let psm = raw.parse::<u8>().map_err(|_| {
                    anyhow!("OCR_PAGE_SEGMENTATION_MODE must be a number, got '{}'", raw)
                })?;
                if psm > 13 {
                    return Err(anyhow!(
                        "OCR_PAGE_SEGMENTATION_MODE must be between 0 and 13, got {}",
                        psm
                    ));
                }
                psm
            }
            Err(_) => 6,
        };

        let tessdata_path = env::var("TESSDATA_PATH").ok().filter(|p| !p.trim().is_empty());

        let max_upload_size_mb = match env::var("MAX_UPLOAD_SIZE_MB") {
            Ok(raw) => {
                let size = raw.parse::<u64>().map_err(|_| {
                    anyhow!("MAX_UPLOAD_SIZE_MB must be a positive number, got '{}'", raw)
                })?;
                if size == 0 {
                    return Err(anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
                }
                size
            }
            Err(_) => 10,
        };

        let extra_ignore_patterns = env::var("LABREPORT_EXTRA_IGNORE_PATTERNS")
            .map(|raw| split_ignore_patterns(&raw))
            .unwrap_or_default();

        let config = Config {
            server_address,
            ocr: OcrConfig {
                language,
                page_segmentation_mode,
                tessdata_path,
            },
            max_upload_size_mb,
            extra_ignore_patterns,
        };

        // Surface bad patterns at startup rather than on the first request
        config
            .parser()
            .context("LABREPORT_EXTRA_IGNORE_PATTERNS contains an invalid regex")?;

        info!("🌐 SERVER_ADDRESS: {}", config.server_address);
        info!("🔤 OCR_LANGUAGE: {}", config.ocr.language);
        info!("📐 OCR_PAGE_SEGMENTATION_MODE: {}", config.ocr.page_segmentation_mode);
        info!(
            "📂 TESSDATA_PATH: {}",
            config.ocr.tessdata_path.as_deref().unwrap_or("(system default)")
        );
        info!("📦 MAX_UPLOAD_SIZE_MB: {}", config.max_upload_size_mb);
        info!("🧹 Extra ignore patterns: {}", config.extra_ignore_patterns.len());

        Ok(config)
    }

    /// Upload limit in bytes, as used by the request body limit layer
    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Build the parser: default boilerplate patterns plus the configured extras.
    pub fn parser(&self) -> Result<LabReportParser, regex::Error> {
        let classifier = LineClassifier::with_extra_patterns(&self.extra_ignore_patterns)?;
        Ok(LabReportParser::new(classifier))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8000".to_string(),
            ocr: OcrConfig::default(),
            max_upload_size_mb: 10,
            extra_ignore_patterns: Vec::new(),
        }
    }
}

fn split_ignore_patterns(raw: &str) -> Vec<String> {
    raw.split(IGNORE_PATTERN_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tesseract language specs look like `eng` or `eng+hin`
fn validate_ocr_language(language: &str) -> Result<()> {
    let valid = !language.is_empty()
        && language.split('+').all(|code| {
            code.len() == 3 && code.chars().all(|c| c.is_ascii_lowercase())
        });
    if valid {
        Ok(())
    } else {
        Err(anyhow!(
            "OCR_LANGUAGE must be one or more 3-letter language codes joined by '+', got '{}'",
            language
        ))
    }
}
