//! First parsing stage: split OCR text into lines and drop boilerplate.

use regex::Regex;
use tracing::trace;

use super::patterns::{compile_case_insensitive, DEFAULT_IGNORE_REGEXES};

/// A single line of OCR output, trimmed, with its index on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub position: usize,
    pub text: String,
}

/// A line that survived noise filtering and may carry test data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    pub position: usize,
    pub text: String,
}

impl CandidateLine {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// True when `previous` sat directly above this line in the OCR output.
    pub fn follows(&self, previous_position: usize) -> bool {
        previous_position + 1 == self.position
    }
}

impl From<RawLine> for CandidateLine {
    fn from(line: RawLine) -> Self {
        Self {
            position: line.position,
            text: line.text,
        }
    }
}

/// Split OCR text into trimmed lines, keeping every line's original index.
pub fn split_lines(text: &str) -> Vec<RawLine> {
    text.lines()
        .enumerate()
        .map(|(position, line)| RawLine {
            position,
            text: line.trim().to_string(),
        })
        .collect()
}

/// Drops empty lines and report boilerplate before field extraction.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    ignore_patterns: Vec<Regex>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self {
            ignore_patterns: DEFAULT_IGNORE_REGEXES.clone(),
        }
    }
}

impl LineClassifier {
    /// Build a classifier from an explicit pattern set, replacing the defaults.
    pub fn new(ignore_patterns: Vec<Regex>) -> Self {
        Self { ignore_patterns }
    }

    /// Default patterns plus `extra`, each compiled case-insensitively.
    pub fn with_extra_patterns<S: AsRef<str>>(extra: &[S]) -> Result<Self, regex::Error> {
        let mut classifier = Self::default();
        for pattern in extra {
            classifier
                .ignore_patterns
                .push(compile_case_insensitive(pattern.as_ref())?);
        }
        Ok(classifier)
    }

    pub fn pattern_count(&self) -> usize {
        self.ignore_patterns.len()
    }

    /// Empty lines and lines matching any ignore pattern are noise.
    pub fn is_noise(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty() || self.ignore_patterns.iter().any(|re| re.is_match(trimmed))
    }

    pub fn classify(&self, text: &str) -> Vec<CandidateLine> {
        split_lines(text)
            .into_iter()
            .filter(|line| {
                let noise = self.is_noise(&line.text);
                if noise && !line.text.is_empty() {
                    trace!("Discarding boilerplate line {}: {:?}", line.position, line.text);
                }
                !noise
            })
            .map(CandidateLine::from)
            .collect()
    }
}
