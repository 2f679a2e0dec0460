//! Lab report parsing engine.
//!
//! Turns the text produced by OCR for one report into [`TestRecord`]s:
//!
//! 1. [`line_classifier`] drops empty lines and boilerplate
//! 2. [`field_extractor`] pulls value, unit and reference range out of each line
//! 3. [`assembler`] builds records, carrying names over from the previous line
//! 4. [`range_evaluator`] sets the out-of-range flag on every record
//!
//! Everything here is synchronous and free of I/O. Parsing never fails;
//! poor input simply produces fewer fields or fewer records.

pub mod assembler;
pub mod field_extractor;
pub mod line_classifier;
pub mod patterns;
pub mod range_evaluator;

use tracing::debug;

use crate::models::TestRecord;
pub use line_classifier::{CandidateLine, LineClassifier, RawLine};
pub use range_evaluator::{ParsedRange, ParsedValue};

#[derive(Debug, Clone, Default)]
pub struct LabReportParser {
    classifier: LineClassifier,
}

impl LabReportParser {
    pub fn new(classifier: LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    pub fn parse(&self, text: &str) -> Vec<TestRecord> {
        let candidates = self.classifier.classify(text);
        let mut records = assembler::assemble(&candidates);

        for record in &mut records {
            record.lab_test_out_of_range = range_evaluator::evaluate(
                record.test_value.as_deref(),
                record.bio_reference_range.as_deref(),
            );
        }

        let decided = records
            .iter()
            .filter(|r| r.lab_test_out_of_range.is_known())
            .count();
        debug!(
            "Parsed {} test records ({} with a decided range flag) from {} candidate lines",
            records.len(),
            decided,
            candidates.len()
        );
        records
    }
}

/// Parse with the default boilerplate patterns.
pub fn parse_lab_report(text: &str) -> Vec<TestRecord> {
    LabReportParser::default().parse(text)
}
