pub mod commands;
pub mod config;
pub mod models;
pub mod ocr;
pub mod parsing;
pub mod routes;
pub mod test_helpers;
pub mod utils;


use std::sync::Arc;

use crate::config::Config;
use crate::ocr::TextRecognizer;
use crate::parsing::LabReportParser;

pub use crate::models::{ApiResponse, RangeFlag, TestRecord};
pub use crate::parsing::parse_lab_report;
pub use crate::routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub parser: Arc<LabReportParser>,
}

impl AppState {
    /// Assemble shared state, compiling the configured ignore patterns.
    pub fn new(config: Config, recognizer: Arc<dyn TextRecognizer>) -> anyhow::Result<Self> {
        let parser = Arc::new(config.parser()?);
        Ok(Self {
            config,
            recognizer,
            parser,
        })
    }
}
